//! Kardiyo Status Tool
//!
//! Provides runtime status information about the registry service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::config::Config;

/// Runtime status of the registry service
#[derive(Debug, Clone, Serialize)]
pub struct KardiyoStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Sheets in use
    pub patient_sheet: String,
    pub case_sheet: String,
    pub key_field: String,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    patient_sheet: String,
    case_sheet: String,
    key_field: String,
}

impl StatusTracker {
    pub fn new(config: &Config) -> Self {
        Self {
            start_time: Instant::now(),
            database_path: config.database_path.clone(),
            patient_sheet: config.patient_sheet.clone(),
            case_sheet: config.case_sheet.clone(),
            key_field: config.key_field.clone(),
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> KardiyoStatus {
        let build_info = BuildInfo::current();

        // Absent for a database that was never created
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        KardiyoStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            patient_sheet: self.patient_sheet.clone(),
            case_sheet: self.case_sheet.clone(),
            key_field: self.key_field.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
