//! Case note model
//!
//! Follow-up notes kept in their own sheet. Notes are a log: each one is keyed
//! by the moment it was written, so saving a note never merges into another.

use serde::{Deserialize, Serialize};

use super::record::Record;

/// Timestamp key of a note (`YYYY-MM-DD HH:MM:SS`, UTC)
pub const NOTE_TIMESTAMP: &str = "Tarih";
pub const NOTE_FILE_NUMBER: &str = "Dosya No";
pub const NOTE_PATIENT: &str = "Hasta";
pub const NOTE_DOCTOR: &str = "Doktor";
pub const NOTE_TEXT: &str = "Not";

/// Timestamp format of the note key
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A case follow-up note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseNote {
    pub timestamp: String,
    pub file_number: String,
    pub patient: String,
    pub doctor: String,
    pub note: String,
}

impl CaseNote {
    /// Create a note stamped with the current time
    pub fn new(file_number: &str, patient: &str, doctor: &str, note: &str) -> Self {
        Self {
            timestamp: chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            file_number: file_number.trim().to_string(),
            patient: patient.trim().to_string(),
            doctor: doctor.trim().to_string(),
            note: note.to_string(),
        }
    }

    /// Sheet record of the note, in column order
    pub fn to_record(&self) -> Record {
        Record::new()
            .with(NOTE_TIMESTAMP, self.timestamp.as_str())
            .with(NOTE_FILE_NUMBER, self.file_number.as_str())
            .with(NOTE_PATIENT, self.patient.as_str())
            .with(NOTE_DOCTOR, self.doctor.as_str())
            .with(NOTE_TEXT, self.note.as_str())
    }

    /// Read a note back from a sheet record
    pub fn from_record(record: &Record) -> Self {
        Self {
            timestamp: record.text(NOTE_TIMESTAMP),
            file_number: record.text(NOTE_FILE_NUMBER),
            patient: record.text(NOTE_PATIENT),
            doctor: record.text(NOTE_DOCTOR),
            note: record.text(NOTE_TEXT),
        }
    }
}
