//! Patient field catalogue
//!
//! Column names of the H-Type HT patient sheet, grouped by the form tab that
//! collects them, and the fixed choice lists some of them use.

use serde::{Deserialize, Serialize};

use super::record::Record;

/// Unique patient key (hospital file number)
pub const FILE_NUMBER: &str = "Dosya Numarası";
pub const VISIT_DATE: &str = "Tarih";
pub const SEX: &str = "Cinsiyet";
pub const ECG: &str = "EKG";

pub const HEIGHT_CM: &str = "Boy";
pub const WEIGHT_KG: &str = "Kilo";

pub const LVEDD_MM: &str = "LVEDD";
pub const IVS_MM: &str = "IVS";
pub const PW_MM: &str = "PW";
pub const LVEDV: &str = "LVEDV";
pub const MITRAL_E: &str = "Mitral E";
pub const MITRAL_A: &str = "Mitral A";
pub const SEPTAL_E_PRIME: &str = "Septal e'";
pub const LAEDV: &str = "LAEDV";
pub const TAPSE: &str = "TAPSE";
pub const RV_SM: &str = "RV Sm";
pub const SPAP: &str = "sPAP";

/// Derived metric columns
pub const BMI: &str = "BMI";
pub const BSA: &str = "BSA";
pub const LV_MASS: &str = "LV Mass";
pub const LVMI: &str = "LVMi";
pub const RWT: &str = "RWT";
pub const MITRAL_E_A: &str = "Mitral E/A";
pub const MITRAL_E_E_PRIME: &str = "Mitral E/e'";
pub const LACI: &str = "LACi";
pub const TAPSE_SM: &str = "TAPSE/Sm";
pub const TAPSE_SPAP: &str = "TAPSE/sPAP";

const CLINICAL_FIELDS: &[&str] = &[
    FILE_NUMBER, "Adı Soyadı", VISIT_DATE, "Hekim", "İletişim", "Yaş", SEX, HEIGHT_CM,
    WEIGHT_KG, BMI, BSA, "TA Sistol", "TA Diyastol", ECG, "İlaçlar", "Başlanan İlaçlar",
    "DM", "KAH", "HPL", "İnme", "Diğer Hast",
];

const LAB_FIELDS: &[&str] = &[
    "Hgb", "Hct", "WBC", "PLT", "Neu", "Lym", "MPV", "RDW",
    "Glukoz", "Üre", "Kreatinin", "Ürik Asit", "Na", "K", "ALT", "AST", "Tot. Prot", "Albümin",
    "Chol", "LDL", "HDL", "Trig",
    "Lp(a)", "Homosistein", "Folik Asit", "B12",
];

const ECHO_FIELDS: &[&str] = &[
    LVEDD_MM, "LVESD", IVS_MM, PW_MM, LVEDV, "LVESV", LV_MASS, LVMI, RWT, "Ao Asc",
    "LVEF", "SV", "LVOT VTI", "GLS", "GCS", "SD-LS",
    MITRAL_E, MITRAL_A, MITRAL_E_A, SEPTAL_E_PRIME, "Lateral e'", MITRAL_E_E_PRIME,
    LAEDV, "LAESV", "LA Strain", LACI,
    TAPSE, RV_SM, TAPSE_SM, SPAP, TAPSE_SPAP, "RVOT VTI", "RVOT accT",
];

/// Form tab a field is entered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormTab {
    Clinical,
    Lab,
    Echo,
}

impl FormTab {
    pub const ALL: [FormTab; 3] = [FormTab::Clinical, FormTab::Lab, FormTab::Echo];

    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            FormTab::Clinical => CLINICAL_FIELDS,
            FormTab::Lab => LAB_FIELDS,
            FormTab::Echo => ECHO_FIELDS,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FormTab::Clinical => "Klinik",
            FormTab::Lab => "Laboratuvar",
            FormTab::Echo => "Eko",
        }
    }

    /// Tab that collects `field`, if it is a catalogued field
    pub fn of(field: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.fields().iter().any(|f| *f == field))
    }
}

/// Every catalogued column in sheet order
pub fn catalogue() -> impl Iterator<Item = &'static str> {
    FormTab::ALL.into_iter().flat_map(|tab| tab.fields().iter().copied())
}

/// Reorder a record so catalogued fields come first, in sheet order,
/// followed by any other fields in their original order.
pub fn canonical_order(record: Record) -> Record {
    let mut ordered = Record::new();
    for field in catalogue() {
        if let Some(value) = record.get(field) {
            ordered.insert(field, value.clone());
        }
    }
    for (field, value) in record.iter() {
        if !ordered.contains(field) {
            ordered.insert(field.clone(), value.clone());
        }
    }
    ordered
}

/// Patient sex as recorded on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Erkek",
            Sex::Female => "Kadın",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "Erkek" | "E" => Some(Sex::Male),
            "Kadın" | "K" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Resting ECG finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcgFinding {
    Nsr,
    Lbbb,
    Rbbb,
    Vpb,
    Svt,
    Other,
}

impl EcgFinding {
    pub const ALL: [EcgFinding; 6] = [
        EcgFinding::Nsr,
        EcgFinding::Lbbb,
        EcgFinding::Rbbb,
        EcgFinding::Vpb,
        EcgFinding::Svt,
        EcgFinding::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EcgFinding::Nsr => "NSR",
            EcgFinding::Lbbb => "LBBB",
            EcgFinding::Rbbb => "RBBB",
            EcgFinding::Vpb => "VPB",
            EcgFinding::Svt => "SVT",
            EcgFinding::Other => "Diğer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_has_unique_columns() {
        let all: Vec<&str> = catalogue().collect();
        let mut deduped = all.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(all.len(), deduped.len());
        assert_eq!(all[0], FILE_NUMBER);
    }

    #[test]
    fn test_tab_lookup() {
        assert_eq!(FormTab::of("Boy"), Some(FormTab::Clinical));
        assert_eq!(FormTab::of("Hgb"), Some(FormTab::Lab));
        assert_eq!(FormTab::of(TAPSE_SPAP), Some(FormTab::Echo));
        assert_eq!(FormTab::of("Unknown"), None);
    }

    #[test]
    fn test_canonical_order() {
        let record = Record::new()
            .with("Extra", "x")
            .with("Hgb", "13.5")
            .with("Kilo", "72")
            .with(FILE_NUMBER, "123");

        let ordered = canonical_order(record);
        let names: Vec<&String> = ordered.field_names().collect();
        assert_eq!(names, vec![FILE_NUMBER, "Kilo", "Hgb", "Extra"]);
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!(Sex::from_str("Kadın"), Some(Sex::Female));
        assert_eq!(Sex::from_str(" Erkek "), Some(Sex::Male));
        assert_eq!(Sex::from_str("x"), None);
        assert_eq!(EcgFinding::from_str("lbbb"), Some(EcgFinding::Lbbb));
        assert_eq!(EcgFinding::from_str("Diğer"), Some(EcgFinding::Other));
        assert_eq!(EcgFinding::from_str("AF"), None);
    }
}
