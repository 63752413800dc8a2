//! Cardiology index formulas
//!
//! Each formula returns its neutral default (0.0) unless its inputs satisfy
//! the formula's precondition, so callers never see NaN or infinity.

/// Millimetres to centimetres
fn mm_to_cm(mm: f64) -> f64 {
    mm / 10.0
}

/// Ratio `num / den`, or 0.0 unless `den > 0`
fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Body mass index (kg/m²)
pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
    if height_cm > 0.0 {
        let height_m = height_cm / 100.0;
        weight_kg / (height_m * height_m)
    } else {
        0.0
    }
}

/// Body surface area, Mosteller (m²)
pub fn bsa(height_cm: f64, weight_kg: f64) -> f64 {
    if height_cm > 0.0 && weight_kg > 0.0 {
        (height_cm * weight_kg / 3600.0).sqrt()
    } else {
        0.0
    }
}

/// Left ventricular mass, Devereux cube formula (g)
///
/// Inputs are diastolic LV internal diameter, septal and posterior wall
/// thickness, all in millimetres.
pub fn lv_mass(lvidd_mm: f64, ivs_mm: f64, pw_mm: f64) -> f64 {
    if lvidd_mm > 0.0 && ivs_mm > 0.0 && pw_mm > 0.0 {
        let lvidd = mm_to_cm(lvidd_mm);
        let wall_sum = lvidd + mm_to_cm(ivs_mm) + mm_to_cm(pw_mm);
        0.8 * (1.04 * (wall_sum.powi(3) - lvidd.powi(3))) + 0.6
    } else {
        0.0
    }
}

/// LV mass index (g/m²)
pub fn lvmi(lv_mass_g: f64, bsa_m2: f64) -> f64 {
    if lv_mass_g > 0.0 {
        ratio(lv_mass_g, bsa_m2)
    } else {
        0.0
    }
}

/// Relative wall thickness
pub fn rwt(lvidd_mm: f64, pw_mm: f64) -> f64 {
    if lvidd_mm > 0.0 && pw_mm > 0.0 {
        (2.0 * pw_mm) / lvidd_mm
    } else {
        0.0
    }
}

/// Mitral inflow E/A ratio
pub fn e_over_a(e: f64, a: f64) -> f64 {
    ratio(e, a)
}

/// Mitral E over septal e'
pub fn e_over_e_prime(e: f64, septal_e_prime: f64) -> f64 {
    ratio(e, septal_e_prime)
}

/// Left atrial coupling index (LAEDV / LVEDV)
pub fn laci(laedv: f64, lvedv: f64) -> f64 {
    ratio(laedv, lvedv)
}

/// TAPSE over RV systolic tissue velocity
pub fn tapse_over_sm(tapse: f64, rv_sm: f64) -> f64 {
    ratio(tapse, rv_sm)
}

/// TAPSE over systolic pulmonary artery pressure
pub fn tapse_over_spap(tapse: f64, spap: f64) -> f64 {
    ratio(tapse, spap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_bmi() {
        assert!(close(bmi(170.0, 70.0), 24.22, 0.005));
        assert!(close(bmi(170.0, 72.0), 24.91, 0.005));
        assert_eq!(bmi(0.0, 80.0), 0.0);
        assert_eq!(bmi(-5.0, 80.0), 0.0);
    }

    #[test]
    fn test_bsa() {
        // sqrt(170 * 70 / 3600) = 1.8181
        assert!(close(bsa(170.0, 70.0), 1.8181, 0.001));
        assert_eq!(bsa(170.0, 0.0), 0.0);
        assert_eq!(bsa(0.0, 70.0), 0.0);
    }

    #[test]
    fn test_lv_mass() {
        // LVIDd 48 mm, IVS 11 mm, PW 10 mm:
        // 0.8 * 1.04 * (6.9^3 - 4.8^3) + 0.6 = 0.832 * (328.509 - 110.592) + 0.6
        let mass = lv_mass(48.0, 11.0, 10.0);
        assert!(close(mass, 181.907, 0.01));
        assert_eq!(lv_mass(0.0, 11.0, 10.0), 0.0);
        assert_eq!(lv_mass(48.0, 0.0, 10.0), 0.0);
        assert_eq!(lv_mass(48.0, 11.0, 0.0), 0.0);
    }

    #[test]
    fn test_lvmi() {
        assert!(close(lvmi(181.907, 1.8181), 100.05, 0.01));
        assert_eq!(lvmi(181.907, 0.0), 0.0);
        assert_eq!(lvmi(0.0, 1.8), 0.0);
    }

    #[test]
    fn test_rwt() {
        assert!(close(rwt(48.0, 10.0), 0.4167, 0.0001));
        assert_eq!(rwt(0.0, 8.0), 0.0);
        assert_eq!(rwt(48.0, 0.0), 0.0);
    }

    #[test]
    fn test_ratios() {
        assert!(close(e_over_a(60.0, 80.0), 0.75, 1e-9));
        assert_eq!(e_over_a(60.0, 0.0), 0.0);
        assert!(close(e_over_e_prime(60.0, 6.0), 10.0, 1e-9));
        assert_eq!(e_over_e_prime(60.0, 0.0), 0.0);
        assert!(close(laci(40.0, 120.0), 0.3333, 0.0001));
        assert_eq!(laci(40.0, 0.0), 0.0);
        assert!(close(tapse_over_sm(22.0, 11.0), 2.0, 1e-9));
        assert_eq!(tapse_over_sm(22.0, 0.0), 0.0);
        assert!(close(tapse_over_spap(22.0, 30.0), 0.7333, 0.0001));
        assert_eq!(tapse_over_spap(22.0, -1.0), 0.0);
    }
}
