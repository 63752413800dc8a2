//! Record store over a sheet resource
//!
//! Every operation is one read-then-write round trip against the sheet. There
//! is no locking and the delete-then-append pair of an update is not atomic.

use tracing::{debug, info, warn};

use super::{StoreError, StoreResult, UpsertOutcome};
use crate::models::{FieldValue, Record, Table};
use crate::sheet::{ResourceError, SheetResource};

/// Keyed access to the records of one sheet
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    resource: R,
}

impl<R: SheetResource> RecordStore<R> {
    pub fn new(resource: R) -> Self {
        Self { resource }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Read and repair the whole sheet
    pub fn load(&self) -> StoreResult<Table> {
        let rows = self
            .resource
            .read_all_rows()
            .map_err(StoreError::ResourceUnavailable)?;
        Ok(Table::from_rows(rows))
    }

    /// Read the whole sheet, degrading to an empty table when it cannot be
    /// read
    pub fn read_all(&self) -> Table {
        match self.load() {
            Ok(table) => table,
            Err(e) => {
                warn!(sheet = self.resource.name(), error = %e, "reading sheet failed, showing no records");
                Table::empty()
            }
        }
    }

    /// Look up a single record by key
    pub fn get_by_key(
        &self,
        key_field: &str,
        key_value: impl Into<FieldValue>,
    ) -> StoreResult<Option<Record>> {
        let table = self.load()?;
        Ok(table.find_by_key(key_field, key_value).cloned())
    }

    /// Insert `record`, or merge it into the stored record with the same key.
    ///
    /// Blank fields of `record` never overwrite stored values. An updated
    /// record is removed from its row and appended at the end of the sheet.
    pub fn upsert(&self, key_field: &str, record: &Record) -> StoreResult<UpsertOutcome> {
        let key = record.text(key_field);
        if key.is_empty() {
            return Err(StoreError::MissingKey(key_field.to_string()));
        }

        let rows = self
            .resource
            .read_all_rows()
            .map_err(StoreError::ResourceUnavailable)?;

        if rows.is_empty() {
            return self.bootstrap(record);
        }

        let table = self.widen_for(rows, record)?;

        let existing = table.position_by_key(key_field, &key);
        let merged = record.merge_for_schema(
            existing.map(|i| &table.records()[i]),
            table.schema(),
        );
        let cells = merged.to_cells(table.schema().fields());

        let outcome = match existing.and_then(|i| table.row_number(i)) {
            Some(row) => match self.resource.delete_row(row) {
                Ok(()) => UpsertOutcome::Replaced,
                Err(e) => {
                    warn!(sheet = self.resource.name(), key = %key, row, error = %e, "removing old row failed, appending anyway");
                    UpsertOutcome::DuplicateKept {
                        reason: e.to_string(),
                    }
                }
            },
            None => UpsertOutcome::Inserted,
        };

        self.write_row(&cells)?;
        info!(sheet = self.resource.name(), key = %key, outcome = outcome.as_str(), "saved record");
        Ok(outcome)
    }

    /// Append `record` as a new row without looking for an earlier record
    /// with the same key. Fields the sheet lacks are added to the header.
    pub fn append(&self, record: &Record) -> StoreResult<UpsertOutcome> {
        let rows = self
            .resource
            .read_all_rows()
            .map_err(StoreError::ResourceUnavailable)?;

        if rows.is_empty() {
            return self.bootstrap(record);
        }

        let table = self.widen_for(rows, record)?;
        self.write_row(&record.to_cells(table.schema().fields()))?;
        debug!(sheet = self.resource.name(), rows = table.len() + 1, "appended record");
        Ok(UpsertOutcome::Inserted)
    }

    /// Remove the first record whose key field holds `key_value`.
    ///
    /// Returns `Ok(false)` when no such record exists.
    pub fn delete_by_key(
        &self,
        key_field: &str,
        key_value: impl Into<FieldValue>,
    ) -> StoreResult<bool> {
        let key = key_value.into().to_cell();
        if key.is_empty() {
            return Ok(false);
        }

        let table = self.load()?;

        // The cell search is the cheap path but may hit the value in another
        // column; only trust it when the key column of that row agrees.
        let hinted = match self.resource.find_first_cell_matching(&key) {
            Ok(Some(row)) => table
                .record_at_row(row)
                .filter(|r| r.text(key_field) == key)
                .map(|_| row),
            Ok(None) => None,
            Err(e) => {
                debug!(sheet = self.resource.name(), error = %e, "cell search failed, scanning key column");
                None
            }
        };

        let row = match hinted.or_else(|| {
            table
                .position_by_key(key_field, &key)
                .and_then(|i| table.row_number(i))
        }) {
            Some(row) => row,
            None => {
                debug!(sheet = self.resource.name(), key = %key, "no record to delete");
                return Ok(false);
            }
        };

        self.resource
            .delete_row(row)
            .map_err(StoreError::WriteFailed)?;
        info!(sheet = self.resource.name(), key = %key, row, "deleted record");
        Ok(true)
    }

    /// Write the header taken from `record`, then `record` itself
    fn bootstrap(&self, record: &Record) -> StoreResult<UpsertOutcome> {
        let header: Vec<String> = record.field_names().cloned().collect();
        self.write_row(&header)?;
        self.write_row(&record.to_cells(&header))?;
        info!(sheet = self.resource.name(), columns = header.len(), "created sheet with first record");
        Ok(UpsertOutcome::Created)
    }

    /// Repair `rows` into a table whose schema covers every field of
    /// `record`, widening the sheet header where the resource allows it
    fn widen_for(&self, rows: Vec<Vec<String>>, record: &Record) -> StoreResult<Table> {
        let mut raw_header = rows[0].clone();
        let mut table = Table::from_rows(rows);

        let new_fields: Vec<String> = record
            .field_names()
            .filter(|f| !table.schema().contains(f))
            .cloned()
            .collect();

        if new_fields.is_empty() {
            return Ok(table);
        }

        raw_header.extend(new_fields.iter().cloned());
        match self.resource.update_header_row(&raw_header) {
            Ok(()) => {
                for field in &new_fields {
                    table.widen(field);
                }
                info!(sheet = self.resource.name(), added = ?new_fields, "widened sheet header");
            }
            Err(ResourceError::Unsupported(_)) => {
                warn!(sheet = self.resource.name(), dropped = ?new_fields, "sheet cannot widen its header, dropping new fields");
            }
            Err(e) => return Err(StoreError::WriteFailed(e)),
        }
        Ok(table)
    }

    fn write_row(&self, cells: &[String]) -> StoreResult<()> {
        self.resource
            .append_row(cells)
            .map_err(StoreError::WriteFailed)
    }
}
