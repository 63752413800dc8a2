//! NEU-KARDIYO H-Type HT Registry Library
//!
//! Keyed patient records over sheet-like storage and the cardiology indices
//! derived from them.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod metrics;
pub mod models;
pub mod sheet;
pub mod store;
pub mod tools;
