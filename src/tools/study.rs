//! Study criteria

use serde::Serialize;

pub const STUDY_TITLE: &str = "NEU-KARDIYO H-Type HT Study";

pub const INCLUSION: &[&str] = &["Son 6 ayda yeni tanı esansiyel HT"];

pub const EXCLUSION: &[&str] = &[
    "Sekonder HT",
    "KY",
    "AKS",
    "Cerrahi",
    "Konjenital",
    "Pulmoner HT",
    "ABY",
    "AF (Atriyal Fibrilasyon)",
];

/// Inclusion and exclusion criteria of the study
#[derive(Debug, Serialize)]
pub struct StudyCriteria {
    pub title: &'static str,
    pub inclusion: &'static [&'static str],
    pub exclusion: &'static [&'static str],
}

pub fn study_criteria() -> StudyCriteria {
    StudyCriteria {
        title: STUDY_TITLE,
        inclusion: INCLUSION,
        exclusion: EXCLUSION,
    }
}
