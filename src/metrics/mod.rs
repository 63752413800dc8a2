//! Derived metric calculation
//!
//! Pure formulas for the cardiology indices and their record-level aggregate.

pub mod derived;
pub mod formulas;

pub use derived::DerivedMetrics;
