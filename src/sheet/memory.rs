//! In-memory sheet
//!
//! A cloneable handle to rows held in memory. Clones share the same rows.
//! Reads, deletes and appends can be made to fail on demand.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{ResourceError, ResourceResult, SheetResource};

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<Vec<String>>,
    fail_reads: bool,
    fail_deletes: bool,
    fail_appends: bool,
}

/// Sheet backed by a `Vec` of rows
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    name: String,
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::default(),
        }
    }

    /// Create a sheet pre-filled with raw rows (header first)
    pub fn with_rows(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        let sheet = Self::new(name);
        sheet.lock().rows = rows;
        sheet
    }

    /// Snapshot of the current rows
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.lock().rows.clone()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.lock().fail_deletes = fail;
    }

    pub fn set_fail_appends(&self, fail: bool) {
        self.lock().fail_appends = fail;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // Rows stay consistent even if a holder panicked; every mutation is a
        // single Vec operation.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn unavailable(&self, op: &str) -> ResourceError {
        ResourceError::Unavailable(format!("{}: {} failed", self.name, op))
    }
}

impl SheetResource for MemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_all_rows(&self) -> ResourceResult<Vec<Vec<String>>> {
        let state = self.lock();
        if state.fail_reads {
            return Err(self.unavailable("read"));
        }
        Ok(state.rows.clone())
    }

    fn append_row(&self, values: &[String]) -> ResourceResult<()> {
        let mut state = self.lock();
        if state.fail_appends {
            return Err(self.unavailable("append"));
        }
        state.rows.push(values.to_vec());
        Ok(())
    }

    fn delete_row(&self, row_index: usize) -> ResourceResult<()> {
        let mut state = self.lock();
        if state.fail_deletes {
            return Err(self.unavailable("delete"));
        }
        let rows = state.rows.len();
        if row_index == 0 || row_index > rows {
            return Err(ResourceError::RowOutOfRange { row: row_index, rows });
        }
        state.rows.remove(row_index - 1);
        Ok(())
    }

    fn find_first_cell_matching(&self, value: &str) -> ResourceResult<Option<usize>> {
        let state = self.lock();
        if state.fail_reads {
            return Err(self.unavailable("find"));
        }
        Ok(state
            .rows
            .iter()
            .position(|row| row.iter().any(|cell| cell == value))
            .map(|i| i + 1))
    }

    fn update_header_row(&self, values: &[String]) -> ResourceResult<()> {
        let mut state = self.lock();
        if state.rows.is_empty() {
            state.rows.push(values.to_vec());
        } else {
            state.rows[0] = values.to_vec();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_append_find_delete() {
        let sheet = MemorySheet::new("test");
        sheet.append_row(&row(&["A", "B"])).unwrap();
        sheet.append_row(&row(&["1", "x"])).unwrap();
        sheet.append_row(&row(&["2", "y"])).unwrap();

        assert_eq!(sheet.find_first_cell_matching("y").unwrap(), Some(3));
        assert_eq!(sheet.find_first_cell_matching("B").unwrap(), Some(1));
        assert_eq!(sheet.find_first_cell_matching("z").unwrap(), None);

        sheet.delete_row(2).unwrap();
        assert_eq!(sheet.rows(), vec![row(&["A", "B"]), row(&["2", "y"])]);

        assert!(matches!(
            sheet.delete_row(3),
            Err(ResourceError::RowOutOfRange { row: 3, rows: 2 })
        ));
        assert!(sheet.delete_row(0).is_err());
    }

    #[test]
    fn test_header_update() {
        let sheet = MemorySheet::new("test");
        sheet.update_header_row(&row(&["A"])).unwrap();
        sheet.append_row(&row(&["1"])).unwrap();
        sheet.update_header_row(&row(&["A", "B"])).unwrap();
        assert_eq!(sheet.rows(), vec![row(&["A", "B"]), row(&["1"])]);
    }

    #[test]
    fn test_clones_share_rows_and_failures() {
        let sheet = MemorySheet::with_rows("test", vec![row(&["A"])]);
        let handle = sheet.clone();
        handle.append_row(&row(&["1"])).unwrap();
        assert_eq!(sheet.rows().len(), 2);

        handle.set_fail_reads(true);
        assert!(matches!(sheet.read_all_rows(), Err(ResourceError::Unavailable(_))));
        handle.set_fail_reads(false);

        handle.set_fail_appends(true);
        assert!(sheet.append_row(&row(&["2"])).is_err());
        handle.set_fail_deletes(true);
        assert!(sheet.delete_row(2).is_err());
        assert_eq!(sheet.rows().len(), 2);
    }
}
