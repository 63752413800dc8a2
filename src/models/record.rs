//! Record model
//!
//! One patient visit (or one case note): an ordered mapping from field name
//! to value. The schema is implicit; whatever fields a record carries are the
//! fields it asks the sheet to hold.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::table::Schema;
use super::value::FieldValue;

/// An ordered field-name to value mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, serde_json::Value>",
    into = "IndexMap<String, FieldValue>"
)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert or replace a field, keeping its original position when replaced
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.shift_remove(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    /// Build a record from a JSON object, as received from a tool call
    pub fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, FieldValue::from(v)))
                .collect(),
        }
    }

    // ------------------------------------------------------------------
    // Fail-soft accessors
    // ------------------------------------------------------------------

    /// Rendered value of a field, or "" when absent
    pub fn text(&self, field: &str) -> String {
        self.fields
            .get(field)
            .map(FieldValue::to_cell)
            .unwrap_or_default()
    }

    /// True when the field is absent or renders to an empty cell
    pub fn is_blank(&self, field: &str) -> bool {
        self.fields.get(field).map_or(true, FieldValue::is_blank)
    }

    /// Numeric value of a field, or `default` when absent or unparseable
    pub fn number_or(&self, field: &str, default: f64) -> f64 {
        self.fields
            .get(field)
            .and_then(FieldValue::as_number)
            .unwrap_or(default)
    }

    /// Integer value of a field ("54" and "54.0" both read as 54)
    pub fn int_or(&self, field: &str, default: i64) -> i64 {
        match self.fields.get(field) {
            Some(FieldValue::Text(s)) => match s.trim().parse::<i64>() {
                Ok(n) => n,
                Err(_) => self.number_or(field, default as f64) as i64,
            },
            Some(_) => self.number_or(field, default as f64) as i64,
            None => default,
        }
    }

    /// Checkbox-style value of a field
    pub fn flag(&self, field: &str) -> bool {
        self.fields.get(field).map_or(false, FieldValue::as_flag)
    }

    // ------------------------------------------------------------------
    // Merging
    // ------------------------------------------------------------------

    /// Lay this record over `base`.
    ///
    /// Every field of `base` is kept unless this record carries a non-blank
    /// value for it; fields only this record has are added as they are.
    pub fn overlay_onto(&self, base: &Record) -> Record {
        let mut merged = base.clone();
        for (field, value) in &self.fields {
            if !value.is_blank() || !merged.contains(field) {
                merged.insert(field.clone(), value.clone());
            }
        }
        merged
    }

    /// Produce the row written for `schema` when this record is saved over
    /// `existing`.
    ///
    /// Per field: the new value if non-blank, otherwise the existing value,
    /// otherwise "". A save that leaves a field blank never erases it.
    pub fn merge_for_schema(&self, existing: Option<&Record>, schema: &Schema) -> Record {
        let mut merged = Record::new();
        for field in schema.fields() {
            let value = match self.fields.get(field) {
                Some(v) if !v.is_blank() => v.clone(),
                _ => existing
                    .and_then(|e| e.get(field))
                    .cloned()
                    .unwrap_or_default(),
            };
            merged.insert(field.clone(), value);
        }
        merged
    }

    /// Render the record as a row of cells in `fields` order
    pub fn to_cells<S: AsRef<str>>(&self, fields: &[S]) -> Vec<String> {
        fields.iter().map(|f| self.text(f.as_ref())).collect()
    }
}

impl From<IndexMap<String, serde_json::Value>> for Record {
    fn from(map: IndexMap<String, serde_json::Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, FieldValue::from(v)))
                .collect(),
        }
    }
}

impl From<Record> for IndexMap<String, FieldValue> {
    fn from(record: Record) -> Self {
        record.fields
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(names: &[&str]) -> Schema {
        let raw: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        Schema::from_raw_header(&raw)
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let record = Record::new().with("B", "2").with("A", "1").with("C", 3.0);
        let names: Vec<&String> = record.field_names().collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_fail_soft_accessors() {
        let record = Record::new()
            .with("Boy", "170")
            .with("Kilo", 72.5)
            .with("Yaş", "54.0")
            .with("Hgb", "n/a")
            .with("DM", "Evet")
            .with("KAH", false);

        assert_eq!(record.number_or("Boy", 0.0), 170.0);
        assert_eq!(record.number_or("Kilo", 0.0), 72.5);
        assert_eq!(record.number_or("Hgb", 0.0), 0.0);
        assert_eq!(record.number_or("Missing", -1.0), -1.0);
        assert_eq!(record.int_or("Yaş", 0), 54);
        assert_eq!(record.int_or("Hgb", 7), 7);
        assert!(record.flag("DM"));
        assert!(!record.flag("KAH"));
        assert!(!record.flag("Missing"));
        assert_eq!(record.text("Kilo"), "72.5");
        assert_eq!(record.text("Missing"), "");
    }

    #[test]
    fn test_merge_keeps_old_value_on_blank() {
        let existing = Record::new().with("A", "5").with("B", "old");
        let incoming = Record::new().with("A", "5").with("B", "");

        let merged = incoming.merge_for_schema(Some(&existing), &schema(&["A", "B"]));
        assert_eq!(merged.text("A"), "5");
        assert_eq!(merged.text("B"), "old");
    }

    #[test]
    fn test_merge_overwrites_with_non_blank() {
        let existing = Record::new().with("A", "5").with("B", "old");
        let incoming = Record::new().with("A", "5").with("B", "new").with("C", 1.5);

        let merged = incoming.merge_for_schema(Some(&existing), &schema(&["A", "B", "C", "D"]));
        assert_eq!(merged.to_cells(&["A", "B", "C", "D"]), vec!["5", "new", "1.5", ""]);
    }

    #[test]
    fn test_merge_without_existing_fills_blanks() {
        let incoming = Record::new().with("A", "5");
        let merged = incoming.merge_for_schema(None, &schema(&["A", "B"]));
        assert_eq!(merged.to_cells(&["A", "B"]), vec!["5", ""]);
    }

    #[test]
    fn test_overlay_onto() {
        let base = Record::new().with("Boy", "170").with("Kilo", "70").with("Hgb", "12");
        let incoming = Record::new().with("Kilo", "72").with("Hgb", "").with("LDL", "");

        let view = incoming.overlay_onto(&base);
        assert_eq!(view.text("Boy"), "170");
        assert_eq!(view.text("Kilo"), "72");
        assert_eq!(view.text("Hgb"), "12");
        assert!(view.contains("LDL"));
    }

    #[test]
    fn test_json_round_trip_keeps_order_and_types() {
        let json = r#"{"Dosya Numarası": "123", "Boy": 170, "DM": true, "Not": null}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        assert_eq!(record.get("Boy"), Some(&FieldValue::Number(170.0)));
        assert_eq!(record.get("DM"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.text("Not"), "");

        let out = serde_json::to_string(&record).unwrap();
        assert!(out.starts_with(r#"{"Dosya Numarası":"123","Boy":170.0"#));
    }
}
