//! Data models
//!
//! Field values, records, tables and the field catalogues of the study sheets.

pub mod case_note;
pub mod patient;
mod record;
mod table;
mod value;

pub use case_note::CaseNote;
pub use patient::{EcgFinding, FormTab, Sex};
pub use record::Record;
pub use table::{Schema, Table};
pub use value::{parse_number, FieldValue};
