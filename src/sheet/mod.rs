//! Sheet resources
//!
//! A sheet is a flat, row-oriented table of string cells whose first row is
//! the header. This is the only thing the record store needs from its backing
//! storage; SQLite and in-memory implementations are provided.

mod memory;
mod sqlite;

pub use memory::MemorySheet;
pub use sqlite::SqliteSheet;

use thiserror::Error;

use crate::db::DbError;

/// Sheet resource error types
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Sheet unavailable: {0}")]
    Unavailable(String),

    #[error("Row {row} is out of range (sheet has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Operation not supported by this sheet: {0}")]
    Unsupported(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Malformed row cells: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Result type for sheet operations
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Row-oriented tabular storage.
///
/// Row indices are 1-based and row 1 is the header. Deleting a row shifts
/// every later row up by one.
pub trait SheetResource {
    /// Worksheet identifier, for logging
    fn name(&self) -> &str;

    /// All rows, header first
    fn read_all_rows(&self) -> ResourceResult<Vec<Vec<String>>>;

    /// Append a row after the last one
    fn append_row(&self, values: &[String]) -> ResourceResult<()>;

    /// Remove the row at `row_index`
    fn delete_row(&self, row_index: usize) -> ResourceResult<()>;

    /// First row holding a cell exactly equal to `value`, scanning rows top
    /// to bottom
    fn find_first_cell_matching(&self, value: &str) -> ResourceResult<Option<usize>>;

    /// Replace the header row (row 1), creating it on an empty sheet
    fn update_header_row(&self, _values: &[String]) -> ResourceResult<()> {
        Err(ResourceError::Unsupported("update_header_row"))
    }
}

impl<T: SheetResource + ?Sized> SheetResource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read_all_rows(&self) -> ResourceResult<Vec<Vec<String>>> {
        (**self).read_all_rows()
    }

    fn append_row(&self, values: &[String]) -> ResourceResult<()> {
        (**self).append_row(values)
    }

    fn delete_row(&self, row_index: usize) -> ResourceResult<()> {
        (**self).delete_row(row_index)
    }

    fn find_first_cell_matching(&self, value: &str) -> ResourceResult<Option<usize>> {
        (**self).find_first_cell_matching(value)
    }

    fn update_header_row(&self, values: &[String]) -> ResourceResult<()> {
        (**self).update_header_row(values)
    }
}
