//! Kardiyo MCP Server Implementation
//!
//! Implements the MCP server with all registry tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::Database;
use crate::models::case_note::NOTE_TIMESTAMP;
use crate::models::Record;
use crate::sheet::SqliteSheet;
use crate::store::RecordStore;
use crate::tools::status::StatusTracker;
use crate::tools::{case_notes, patients, study};

/// Kardiyo MCP Service
#[derive(Clone)]
pub struct KardiyoService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    patients: RecordStore<SqliteSheet>,
    case_notes: RecordStore<SqliteSheet>,
    key_field: String,
    tool_router: ToolRouter<KardiyoService>,
}

impl KardiyoService {
    pub fn new(config: &Config, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config))),
            patients: RecordStore::new(SqliteSheet::new(database.clone(), &config.patient_sheet)),
            case_notes: RecordStore::new(SqliteSheet::new(database, &config.case_sheet)),
            key_field: config.key_field.clone(),
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Patient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SavePatientParams {
    /// Patient fields keyed by sheet column name (e.g. "Dosya Numarası", "Boy", "Kilo", "LVEDD").
    /// Must include the file number. Blank values never erase stored values.
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PatientKeyParams {
    /// Patient file number
    pub file_number: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ComputeMetricsParams {
    /// Measurements keyed by sheet column name (Boy, Kilo, LVEDD, IVS, PW, Mitral E, ...)
    pub fields: serde_json::Map<String, serde_json::Value>,
}

// ============================================================================
// Case Note Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddCaseNoteParams {
    /// Patient file number
    pub file_number: String,
    /// Patient name
    #[serde(default)]
    pub patient: String,
    /// Responsible doctor
    #[serde(default)]
    pub doctor: String,
    /// Note or plan text
    pub note: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListCaseNotesParams {
    /// Only notes of this file number (optional)
    pub file_number: Option<String>,
}

#[tool_router]
impl KardiyoService {
    // --- Status ---

    #[tool(description = "Get the current status of the registry service including build info, database status, sheet names and process information")]
    async fn kardiyo_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get the inclusion and exclusion criteria of the H-Type hypertension study")]
    fn study_criteria(&self) -> Result<CallToolResult, McpError> {
        to_json(&study::study_criteria())
    }

    // --- Patients ---

    #[tool(description = "Save a patient. Creates the patient or merges the fields into the stored record with the same file number. Derived metrics (BMI, BSA, LV Mass, LVMi, RWT, E/A, E/e', LACi, TAPSE/Sm, TAPSE/sPAP) are computed automatically.")]
    fn save_patient(&self, Parameters(p): Parameters<SavePatientParams>) -> Result<CallToolResult, McpError> {
        let fields = Record::from_json_map(p.fields);
        to_json(&patients::save_patient_report(&self.patients, &self.key_field, fields))
    }

    #[tool(description = "Get a patient by file number, grouped by form tab (clinical, lab, echo) with derived metrics")]
    fn get_patient(&self, Parameters(p): Parameters<PatientKeyParams>) -> Result<CallToolResult, McpError> {
        let result = patients::get_patient(&self.patients, &self.key_field, &p.file_number)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(detail) => to_json(&detail),
            None => to_json(&serde_json::json!({
                "error": "Patient not found",
                "file_number": p.file_number,
            })),
        }
    }

    #[tool(description = "List every patient in the study sheet")]
    fn list_patients(&self) -> Result<CallToolResult, McpError> {
        to_json(&patients::list_patients(&self.patients))
    }

    #[tool(description = "Delete a patient by file number")]
    fn delete_patient(&self, Parameters(p): Parameters<PatientKeyParams>) -> Result<CallToolResult, McpError> {
        to_json(&patients::delete_patient(&self.patients, &self.key_field, &p.file_number))
    }

    #[tool(description = "Preview derived metrics for a set of measurements without saving anything")]
    fn compute_metrics(&self, Parameters(p): Parameters<ComputeMetricsParams>) -> Result<CallToolResult, McpError> {
        let fields = Record::from_json_map(p.fields);
        to_json(&patients::compute_metrics(&fields))
    }

    // --- Case Notes ---

    #[tool(description = "Add a follow-up note for a patient case. Each note is stored as its own row, stamped with the current time.")]
    fn add_case_note(&self, Parameters(p): Parameters<AddCaseNoteParams>) -> Result<CallToolResult, McpError> {
        let result = case_notes::add_case_note(&self.case_notes, &p.file_number, &p.patient, &p.doctor, &p.note)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List case follow-up notes, newest first, optionally for one file number")]
    fn list_case_notes(&self, Parameters(p): Parameters<ListCaseNotesParams>) -> Result<CallToolResult, McpError> {
        to_json(&case_notes::list_case_notes(&self.case_notes, p.file_number.as_deref()))
    }
}

#[tool_handler]
impl ServerHandler for KardiyoService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "kardiyo".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NEU-KARDIYO H-Type HT Registry".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "NEU-KARDIYO H-Type hypertension study registry. \
                 Call study_criteria before enrolling a patient. \
                 Patients are keyed by '{}': save_patient/get_patient/list_patients/delete_patient. \
                 Field names are the Turkish sheet column names (Boy, Kilo, Cinsiyet, EKG, LVEDD, IVS, PW, ...). \
                 compute_metrics previews derived indices without saving. \
                 Case notes ('{}' stamped): add_case_note/list_case_notes.",
                self.key_field, NOTE_TIMESTAMP
            )),
        }
    }
}
