//! Derived metrics of a patient record

use serde::Serialize;

use super::formulas;
use crate::models::patient::{
    BMI, BSA, HEIGHT_CM, IVS_MM, LACI, LAEDV, LVEDD_MM, LVEDV, LVMI, LV_MASS, MITRAL_A,
    MITRAL_E, MITRAL_E_A, MITRAL_E_E_PRIME, PW_MM, RV_SM, RWT, SEPTAL_E_PRIME, SPAP, TAPSE,
    TAPSE_SM, TAPSE_SPAP, WEIGHT_KG,
};
use crate::models::Record;

/// Indices computed from the raw measurements of a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub bmi: f64,
    pub bsa: f64,
    pub lv_mass: f64,
    pub lvmi: f64,
    pub rwt: f64,
    pub mitral_e_a: f64,
    pub mitral_e_e_prime: f64,
    pub laci: f64,
    pub tapse_sm: f64,
    pub tapse_spap: f64,
}

impl DerivedMetrics {
    /// Compute every index from a record's fields.
    ///
    /// Missing or unparseable inputs read as 0, which makes the dependent
    /// indices fall back to 0.
    pub fn from_record(record: &Record) -> Self {
        let num = |field: &str| record.number_or(field, 0.0);

        let height = num(HEIGHT_CM);
        let weight = num(WEIGHT_KG);
        let lvedd = num(LVEDD_MM);
        let pw = num(PW_MM);

        let bsa = formulas::bsa(height, weight);
        let lv_mass = formulas::lv_mass(lvedd, num(IVS_MM), pw);

        Self {
            bmi: formulas::bmi(height, weight),
            bsa,
            lv_mass,
            lvmi: formulas::lvmi(lv_mass, bsa),
            rwt: formulas::rwt(lvedd, pw),
            mitral_e_a: formulas::e_over_a(num(MITRAL_E), num(MITRAL_A)),
            mitral_e_e_prime: formulas::e_over_e_prime(num(MITRAL_E), num(SEPTAL_E_PRIME)),
            laci: formulas::laci(num(LAEDV), num(LVEDV)),
            tapse_sm: formulas::tapse_over_sm(num(TAPSE), num(RV_SM)),
            tapse_spap: formulas::tapse_over_spap(num(TAPSE), num(SPAP)),
        }
    }

    /// Sheet column and value of each index
    pub fn columns(&self) -> [(&'static str, f64); 10] {
        [
            (BMI, self.bmi),
            (BSA, self.bsa),
            (LV_MASS, self.lv_mass),
            (LVMI, self.lvmi),
            (RWT, self.rwt),
            (MITRAL_E_A, self.mitral_e_a),
            (MITRAL_E_E_PRIME, self.mitral_e_e_prime),
            (LACI, self.laci),
            (TAPSE_SM, self.tapse_sm),
            (TAPSE_SPAP, self.tapse_spap),
        ]
    }

    /// Write the indices into their columns of `record`
    pub fn apply_to(&self, record: &mut Record) {
        for (column, value) in self.columns() {
            record.insert(column, value);
        }
    }

    /// Human readable summary, one index per line
    pub fn display_lines(&self) -> Vec<String> {
        vec![
            format!("BMI: {:.2}", self.bmi),
            format!("BSA: {:.2} m²", self.bsa),
            format!("LV Mass: {:.1} g", self.lv_mass),
            format!("LVMi: {:.1} g/m²", self.lvmi),
            format!("RWT: {:.2}", self.rwt),
            format!("E/A: {:.2}", self.mitral_e_a),
            format!("E/e': {:.2}", self.mitral_e_e_prime),
            format!("LACi: {:.2}", self.laci),
            format!("TAPSE/Sm: {:.2}", self.tapse_sm),
            format!("TAPSE/sPAP: {:.2}", self.tapse_spap),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;

    #[test]
    fn test_from_record() {
        let record = Record::new()
            .with("Boy", "170")
            .with("Kilo", 70.0)
            .with("LVEDD", "48")
            .with("IVS", "11")
            .with("PW", "10")
            .with("Mitral E", "60")
            .with("Mitral A", "0")
            .with("Septal e'", "6")
            .with("LAEDV", "40")
            .with("LVEDV", "")
            .with("TAPSE", "22")
            .with("RV Sm", "11");

        let m = DerivedMetrics::from_record(&record);
        assert!((m.bmi - 24.22).abs() < 0.005);
        assert!((m.lv_mass - 181.907).abs() < 0.01);
        assert!((m.lvmi - m.lv_mass / m.bsa).abs() < 1e-9);
        assert!((m.rwt - 0.4167).abs() < 0.0001);
        assert_eq!(m.mitral_e_a, 0.0);
        assert!((m.mitral_e_e_prime - 10.0).abs() < 1e-9);
        assert_eq!(m.laci, 0.0);
        assert!((m.tapse_sm - 2.0).abs() < 1e-9);
        assert_eq!(m.tapse_spap, 0.0);
    }

    #[test]
    fn test_empty_record_gives_defaults() {
        assert_eq!(DerivedMetrics::from_record(&Record::new()), DerivedMetrics::default());
    }

    #[test]
    fn test_apply_to_writes_numbers() {
        let mut record = Record::new().with("Boy", "170").with("Kilo", "70");
        DerivedMetrics::from_record(&record).apply_to(&mut record);

        assert!(matches!(record.get("BMI"), Some(FieldValue::Number(_))));
        assert_eq!(record.get("RWT"), Some(&FieldValue::Number(0.0)));
        assert_eq!(record.len(), 12);
    }

    #[test]
    fn test_display_lines() {
        let m = DerivedMetrics {
            bmi: 24.221453,
            lv_mass: 181.906944,
            ..Default::default()
        };
        let lines = m.display_lines();
        assert_eq!(lines[0], "BMI: 24.22");
        assert_eq!(lines[2], "LV Mass: 181.9 g");
    }
}
