//! Table model
//!
//! The in-memory view of a sheet: a header schema plus the records under it.
//! Raw rows are repaired on the way in (duplicate header names, short rows,
//! blank rows) so callers never see a misaligned record.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::record::Record;
use super::value::FieldValue;

/// Ordered, unique field names of a sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    /// Build a schema from a raw header row.
    ///
    /// Repeated names keep their position and get an occurrence suffix: the
    /// second `X` becomes `X_2`, the third `X_3`. A suffix that collides with
    /// a name already in the header is skipped.
    pub fn from_raw_header<S: AsRef<str>>(raw: &[S]) -> Self {
        let raw_names: HashSet<&str> = raw.iter().map(|s| s.as_ref()).collect();
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        let mut used: HashSet<String> = HashSet::new();
        let mut fields = Vec::with_capacity(raw.len());

        for cell in raw {
            let name = cell.as_ref();
            let count = occurrences.entry(name).or_insert(0);
            *count += 1;

            let field = if *count == 1 && !used.contains(name) {
                name.to_string()
            } else {
                let mut n = (*count).max(2);
                loop {
                    let candidate = format!("{}_{}", name, n);
                    if !used.contains(&candidate) && !raw_names.contains(candidate.as_str()) {
                        break candidate;
                    }
                    n += 1;
                }
            };

            used.insert(field.clone());
            fields.push(field);
        }

        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }

    /// Append a field if the schema does not have it yet. Returns whether
    /// the schema grew.
    pub fn widen(&mut self, field: &str) -> bool {
        if self.contains(field) {
            return false;
        }
        self.fields.push(field.to_string());
        true
    }
}

/// Records of one sheet under a shared schema
#[derive(Debug, Clone, Default, Serialize)]
pub struct Table {
    schema: Schema,
    records: Vec<Record>,
    /// 1-based sheet row of each record (row 1 is the header)
    #[serde(skip)]
    row_numbers: Vec<usize>,
}

impl Table {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Interpret raw sheet rows, the first being the header.
    ///
    /// Short rows are padded with "", cells past the header are dropped and
    /// rows with no content at all are skipped. Every value is exposed as
    /// text.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let mut rows = rows.into_iter();
        let header = match rows.next() {
            Some(h) => h,
            None => return Self::empty(),
        };

        let schema = Schema::from_raw_header(&header);
        let width = schema.len();
        let mut records = Vec::new();
        let mut row_numbers = Vec::new();

        for (offset, mut cells) in rows.enumerate() {
            if cells.iter().all(|c| c.is_empty()) {
                continue;
            }
            cells.resize(width, String::new());

            let record: Record = schema
                .fields()
                .iter()
                .cloned()
                .zip(cells.into_iter().map(FieldValue::Text))
                .collect();

            records.push(record);
            row_numbers.push(offset + 2);
        }

        Self {
            schema,
            records,
            row_numbers,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sheet row number (1-based, header is row 1) of the record at `index`
    pub fn row_number(&self, index: usize) -> Option<usize> {
        self.row_numbers.get(index).copied()
    }

    /// Record stored at sheet row `row`
    pub fn record_at_row(&self, row: usize) -> Option<&Record> {
        self.row_numbers
            .iter()
            .position(|r| *r == row)
            .map(|i| &self.records[i])
    }

    /// Index of the first record whose `key_field` equals `key_value` as text
    pub fn position_by_key(&self, key_field: &str, key_value: &str) -> Option<usize> {
        if key_value.is_empty() || !self.schema.contains(key_field) {
            return None;
        }
        self.records
            .iter()
            .position(|r| r.text(key_field) == key_value)
    }

    /// First record whose `key_field` equals the string form of `key_value`
    pub fn find_by_key(
        &self,
        key_field: &str,
        key_value: impl Into<FieldValue>,
    ) -> Option<&Record> {
        let key = key_value.into().to_cell();
        self.position_by_key(key_field, &key)
            .map(|i| &self.records[i])
    }

    /// Add a column; existing records get "" for it
    pub fn widen(&mut self, field: &str) -> bool {
        if !self.schema.widen(field) {
            return false;
        }
        for record in &mut self.records {
            record.insert(field, "");
        }
        true
    }
}
