//! Eligibility tools for the tax saving assistant
//!
//! Pure functions over the loaded catalog: income bracket classification and
//! age-based scheme recommendation.

pub mod eligibility;

pub use eligibility::{classify_income, EligibilityEngine};
