//! Case Note MCP Tools
//!
//! Follow-up notes are kept in their own sheet, one appended row per note,
//! stamped with the time the note was written.

use serde::Serialize;

use crate::models::CaseNote;
use crate::sheet::SheetResource;
use crate::store::RecordStore;

/// Response for add_case_note
#[derive(Debug, Serialize)]
pub struct AddCaseNoteResponse {
    pub timestamp: String,
    pub file_number: String,
    pub outcome: String,
    pub message: String,
}

/// Response for list_case_notes
#[derive(Debug, Serialize)]
pub struct ListCaseNotesResponse {
    pub notes: Vec<CaseNote>,
    pub total: usize,
}

/// Write a new note stamped with the current time
pub fn add_case_note<R: SheetResource>(
    store: &RecordStore<R>,
    file_number: &str,
    patient: &str,
    doctor: &str,
    note: &str,
) -> Result<AddCaseNoteResponse, String> {
    if file_number.trim().is_empty() {
        return Err("File number is required".to_string());
    }
    if note.trim().is_empty() {
        return Err("Note text is required".to_string());
    }

    append_note(store, CaseNote::new(file_number, patient, doctor, note))
}

fn append_note<R: SheetResource>(
    store: &RecordStore<R>,
    note: CaseNote,
) -> Result<AddCaseNoteResponse, String> {
    let outcome = store
        .append(&note.to_record())
        .map_err(|e| format!("Failed to save case note: {}", e))?;

    Ok(AddCaseNoteResponse {
        message: "Kaydedildi".to_string(),
        timestamp: note.timestamp,
        file_number: note.file_number,
        outcome: outcome.as_str().to_string(),
    })
}

/// List notes newest first, optionally only those of one file number.
/// An unreadable sheet lists as empty.
pub fn list_case_notes<R: SheetResource>(
    store: &RecordStore<R>,
    file_number: Option<&str>,
) -> ListCaseNotesResponse {
    let filter = file_number.map(str::trim).filter(|f| !f.is_empty());

    let mut notes: Vec<(usize, CaseNote)> = store
        .read_all()
        .records()
        .iter()
        .map(CaseNote::from_record)
        .filter(|n| filter.map_or(true, |f| n.file_number == f))
        .enumerate()
        .collect();
    // Notes stamped in the same second keep their write order, newest first
    notes.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia)));
    let notes: Vec<CaseNote> = notes.into_iter().map(|(_, note)| note).collect();

    ListCaseNotesResponse {
        total: notes.len(),
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::MemorySheet;

    fn setup() -> (RecordStore<MemorySheet>, MemorySheet) {
        let sheet = MemorySheet::new("Vaka_Takip_Notlari");
        (RecordStore::new(sheet.clone()), sheet)
    }

    fn note_at(timestamp: &str, file_number: &str, text: &str) -> CaseNote {
        CaseNote {
            timestamp: timestamp.to_string(),
            file_number: file_number.to_string(),
            patient: "Hasta".to_string(),
            doctor: "Dr. A".to_string(),
            note: text.to_string(),
        }
    }

    #[test]
    fn test_add_requires_file_number_and_text() {
        let (store, sheet) = setup();
        assert!(add_case_note(&store, " ", "Ali", "Dr. A", "Kontrol").is_err());
        assert!(add_case_note(&store, "12", "Ali", "Dr. A", "").is_err());
        assert!(sheet.rows().is_empty());

        let resp = add_case_note(&store, "12", "Ali", "Dr. A", "Kontrol").unwrap();
        assert_eq!(resp.file_number, "12");
        assert_eq!(resp.outcome, "created");
        assert_eq!(sheet.rows()[0], vec!["Tarih", "Dosya No", "Hasta", "Doktor", "Not"]);
    }

    #[test]
    fn test_notes_are_rows_not_merged_per_patient() {
        let (store, sheet) = setup();
        append_note(&store, note_at("2025-01-01 09:00:00", "12", "ilk")).unwrap();
        append_note(&store, note_at("2025-02-01 09:00:00", "12", "ikinci")).unwrap();
        append_note(&store, note_at("2025-01-15 09:00:00", "40", "diğer")).unwrap();
        assert_eq!(sheet.rows().len(), 4);

        let all = list_case_notes(&store, None);
        assert_eq!(all.total, 3);
        assert_eq!(all.notes[0].note, "ikinci");
        assert_eq!(all.notes[2].note, "ilk");

        let one = list_case_notes(&store, Some(" 12 "));
        assert_eq!(one.total, 2);
        assert!(one.notes.iter().all(|n| n.file_number == "12"));
    }

    #[test]
    fn test_back_to_back_notes_are_both_kept() {
        let (store, sheet) = setup();
        let first = add_case_note(&store, "12", "Ali", "Dr. A", "ilk not").unwrap();
        let second = add_case_note(&store, "40", "Veli", "Dr. B", "ikinci not").unwrap();
        assert_eq!(first.outcome, "created");
        assert_eq!(second.outcome, "inserted");
        assert_eq!(sheet.rows().len(), 3);

        let all = list_case_notes(&store, None);
        assert_eq!(all.total, 2);
        assert_eq!(all.notes[0].note, "ikinci not");
        assert_eq!(all.notes[1].file_number, "12");
    }

    #[test]
    fn test_same_stamp_lists_newest_write_first() {
        let (store, _) = setup();
        append_note(&store, note_at("2025-01-01 09:00:00", "12", "a")).unwrap();
        append_note(&store, note_at("2025-01-01 09:00:00", "12", "b")).unwrap();

        let notes = list_case_notes(&store, Some("12")).notes;
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].note, "b");
        assert_eq!(notes[1].note, "a");
    }

    #[test]
    fn test_unreadable_sheet_lists_empty() {
        let (store, sheet) = setup();
        append_note(&store, note_at("2025-01-01 09:00:00", "12", "ilk")).unwrap();
        sheet.set_fail_reads(true);
        assert_eq!(list_case_notes(&store, None).total, 0);
    }
}
