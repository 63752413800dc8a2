//! Kardiyo Tools module
//!
//! Tool implementations behind the MCP server and the maintenance binaries.

pub mod case_notes;
pub mod patients;
pub mod status;
pub mod study;
