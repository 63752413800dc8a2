//! Patient MCP Tools
//!
//! Tools for saving, listing and deleting patients of the study sheet.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::metrics::DerivedMetrics;
use crate::models::patient::{self, BMI, ECG, SEX, VISIT_DATE};
use crate::models::{EcgFinding, FormTab, Record, Sex};
use crate::sheet::SheetResource;
use crate::store::{RecordStore, UpsertOutcome};

/// Response for save_patient
#[derive(Debug, Serialize)]
pub struct SavePatientResponse {
    pub success: bool,
    pub key: String,
    pub outcome: String,
    pub updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub metrics: DerivedMetrics,
    pub message: String,
}

/// What the caller sees of a save: the saved patient, or why it failed
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SaveReport {
    Saved(SavePatientResponse),
    Failed { success: bool, message: String },
}

/// Response for list_patients
#[derive(Debug, Serialize)]
pub struct ListPatientsResponse {
    pub columns: Vec<String>,
    pub patients: Vec<IndexMap<String, String>>,
    pub total: usize,
}

/// Fields of one form tab
#[derive(Debug, Serialize)]
pub struct TabSection {
    pub tab: FormTab,
    pub name: &'static str,
    pub fields: IndexMap<String, String>,
}

/// Full patient detail, grouped by form tab
#[derive(Debug, Serialize)]
pub struct PatientDetail {
    pub key: String,
    pub sections: Vec<TabSection>,
    /// Columns that belong to no form tab
    pub other: IndexMap<String, String>,
    pub metrics: DerivedMetrics,
}

/// Response for delete_patient
#[derive(Debug, Serialize)]
pub struct DeletePatientResponse {
    pub success: bool,
    pub key: String,
    pub message: String,
}

/// Response for compute_metrics
#[derive(Debug, Serialize)]
pub struct ComputeMetricsResponse {
    pub metrics: DerivedMetrics,
    pub summary: Vec<String>,
}

/// One patient touched by recalculate_all
#[derive(Debug, Serialize)]
pub struct RecalculatedPatient {
    pub key: String,
    pub old_bmi: f64,
    pub new_bmi: f64,
    pub outcome: String,
}

/// Response for recalculate_all
#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub patients: Vec<RecalculatedPatient>,
    pub total: usize,
}

fn validate_choices(fields: &Record) -> Result<(), String> {
    if !fields.is_blank(SEX) {
        let value = fields.text(SEX);
        if Sex::from_str(&value).is_none() {
            return Err(format!(
                "Invalid {}: '{}'. Valid values: {}, {}",
                SEX,
                value,
                Sex::Male.as_str(),
                Sex::Female.as_str()
            ));
        }
    }
    if !fields.is_blank(ECG) {
        let value = fields.text(ECG);
        if EcgFinding::from_str(&value).is_none() {
            let valid: Vec<&str> = EcgFinding::ALL.iter().map(|f| f.as_str()).collect();
            return Err(format!(
                "Invalid {}: '{}'. Valid values: {}",
                ECG,
                value,
                valid.join(", ")
            ));
        }
    }
    Ok(())
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn stringify(record: &Record) -> IndexMap<String, String> {
    record
        .iter()
        .map(|(field, value)| (field.clone(), value.to_cell()))
        .collect()
}

/// Save a patient, merging into the stored record with the same key.
///
/// Derived metrics are computed from the stored record overlaid with
/// `fields`, so saving a single form tab keeps the indices that depend on
/// other tabs.
pub fn save_patient<R: SheetResource>(
    store: &RecordStore<R>,
    key_field: &str,
    mut fields: Record,
) -> Result<SavePatientResponse, String> {
    let key = fields.text(key_field).trim().to_string();
    if key.is_empty() {
        return Err(format!("{} is required", key_field));
    }
    fields.insert(key_field, key.as_str());

    validate_choices(&fields)?;

    let existing = store
        .get_by_key(key_field, key.as_str())
        .map_err(|e| format!("Failed to read patients: {}", e))?;

    let has_date = existing
        .as_ref()
        .map_or(false, |r| !r.is_blank(VISIT_DATE));
    if fields.is_blank(VISIT_DATE) && !has_date {
        fields.insert(VISIT_DATE, today());
    }

    let merged = match &existing {
        Some(stored) => fields.overlay_onto(stored),
        None => fields.clone(),
    };
    let metrics = DerivedMetrics::from_record(&merged);
    metrics.apply_to(&mut fields);

    let record = patient::canonical_order(fields);
    let outcome = store
        .upsert(key_field, &record)
        .map_err(|e| format!("Failed to save patient: {}", e))?;

    let warning = match &outcome {
        UpsertOutcome::DuplicateKept { reason } => {
            warn!(key = %key, reason = %reason, "old patient row could not be removed");
            Some(format!(
                "The previous row of {} could not be removed and now appears twice: {}",
                key, reason
            ))
        }
        _ => None,
    };

    let verb = if outcome.is_update() {
        "güncellendi"
    } else {
        "kaydedildi"
    };

    Ok(SavePatientResponse {
        success: true,
        message: format!("{} nolu hasta başarıyla {}", key, verb),
        key,
        outcome: outcome.as_str().to_string(),
        updated: outcome.is_update(),
        warning,
        metrics,
    })
}

/// Save a patient, reporting failures in the response instead of as errors
pub fn save_patient_report<R: SheetResource>(
    store: &RecordStore<R>,
    key_field: &str,
    fields: Record,
) -> SaveReport {
    match save_patient(store, key_field, fields) {
        Ok(saved) => SaveReport::Saved(saved),
        Err(message) => {
            warn!(error = %message, "saving patient failed");
            SaveReport::Failed {
                success: false,
                message,
            }
        }
    }
}

/// List every patient; an unreadable sheet lists as empty
pub fn list_patients<R: SheetResource>(store: &RecordStore<R>) -> ListPatientsResponse {
    let table = store.read_all();
    let patients: Vec<IndexMap<String, String>> = table.records().iter().map(stringify).collect();

    ListPatientsResponse {
        columns: table.schema().fields().to_vec(),
        total: patients.len(),
        patients,
    }
}

/// Get a patient grouped by form tab
pub fn get_patient<R: SheetResource>(
    store: &RecordStore<R>,
    key_field: &str,
    key: &str,
) -> Result<Option<PatientDetail>, String> {
    let record = match store
        .get_by_key(key_field, key.trim())
        .map_err(|e| format!("Failed to read patients: {}", e))?
    {
        Some(record) => record,
        None => return Ok(None),
    };

    let sections = FormTab::ALL
        .into_iter()
        .map(|tab| TabSection {
            tab,
            name: tab.display_name(),
            fields: tab
                .fields()
                .iter()
                .filter(|field| record.contains(field))
                .map(|field| (field.to_string(), record.text(field)))
                .collect(),
        })
        .collect();

    let other = record
        .iter()
        .filter(|(field, _)| FormTab::of(field).is_none())
        .map(|(field, value)| (field.clone(), value.to_cell()))
        .collect();

    Ok(Some(PatientDetail {
        key: record.text(key_field),
        sections,
        other,
        metrics: DerivedMetrics::from_record(&record),
    }))
}

/// Delete a patient. Failures are reported in the response, never as errors.
pub fn delete_patient<R: SheetResource>(
    store: &RecordStore<R>,
    key_field: &str,
    key: &str,
) -> DeletePatientResponse {
    let key = key.trim().to_string();
    let (success, message) = match store.delete_by_key(key_field, key.as_str()) {
        Ok(true) => (true, format!("{} nolu hasta silindi", key)),
        Ok(false) => (false, format!("{} nolu hasta bulunamadı", key)),
        Err(e) => {
            warn!(key = %key, error = %e, "deleting patient failed");
            (false, format!("{} nolu hasta silinemedi: {}", key, e))
        }
    };

    DeletePatientResponse {
        success,
        key,
        message,
    }
}

/// Preview derived metrics for a set of fields without saving
pub fn compute_metrics(fields: &Record) -> ComputeMetricsResponse {
    let metrics = DerivedMetrics::from_record(fields);
    ComputeMetricsResponse {
        summary: metrics.display_lines(),
        metrics,
    }
}

/// Recompute the derived metrics of stored patients and save them back.
///
/// With `only`, just the patient with that key is recalculated.
pub fn recalculate_all<R: SheetResource>(
    store: &RecordStore<R>,
    key_field: &str,
    only: Option<&str>,
) -> Result<RecalculateResponse, String> {
    let table = store
        .load()
        .map_err(|e| format!("Failed to read patients: {}", e))?;

    let mut patients = Vec::new();
    for record in table.into_records() {
        let key = record.text(key_field);
        if key.is_empty() || only.map_or(false, |k| k.trim() != key) {
            continue;
        }

        let old_bmi = record.number_or(BMI, 0.0);
        let metrics = DerivedMetrics::from_record(&record);
        let mut updated = record;
        metrics.apply_to(&mut updated);

        let outcome = store
            .upsert(key_field, &updated)
            .map_err(|e| format!("Failed to save patient {}: {}", key, e))?;

        patients.push(RecalculatedPatient {
            key,
            old_bmi,
            new_bmi: metrics.bmi,
            outcome: outcome.as_str().to_string(),
        });
    }

    info!(count = patients.len(), "recalculated derived metrics");
    Ok(RecalculateResponse {
        total: patients.len(),
        patients,
    })
}
