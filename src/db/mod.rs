//! Database module
//!
//! SQLite pool and the schema of the sheet row store.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
