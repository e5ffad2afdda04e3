//! Tax catalog data model
//!
//! Schemes, investment options and eligibility rules as the rest of the
//! system sees them after the catalog has been loaded and validated.
//! Loading itself lives in the config crate.

use serde::Serialize;
use std::fmt;

/// Contribution/deduction limit of a scheme
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionLimit {
    /// Limit in INR
    Amount(f64),
    /// No upper limit
    Unlimited,
}

impl fmt::Display for DeductionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(value) => write!(f, "INR {}", value),
            Self::Unlimited => write!(f, "No upper limit"),
        }
    }
}

/// Maximum age admitted by an eligibility rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeLimit {
    /// Inclusive maximum age in years
    Max(u32),
    NoLimit,
}

impl AgeLimit {
    /// Check if the age is within the limit (inclusive)
    pub fn admits(&self, age: u32) -> bool {
        match self {
            Self::Max(max) => age <= *max,
            Self::NoLimit => true,
        }
    }
}

impl fmt::Display for AgeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Max(max) => write!(f, "{}", max),
            Self::NoLimit => write!(f, "No age limit"),
        }
    }
}

/// Income ceiling of an eligibility rule
///
/// Carried as reference data; recommendations do not filter on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeLimit {
    Max(f64),
    NoLimit,
}

impl fmt::Display for IncomeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Max(max) => write!(f, "INR {}", max),
            Self::NoLimit => write!(f, "No income limit"),
        }
    }
}

/// A concrete way to use a scheme (e.g. PPF under Section 80C)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentOption {
    pub name: String,
    pub description: String,
    pub benefit: String,
    /// Application procedure, in order
    pub application_steps: Vec<String>,
    /// External application link (not validated)
    pub application_link: String,
}

/// A tax-saving scheme, identified by its section code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scheme {
    /// Section code, e.g. "Section 80C"
    pub id: String,
    pub description: String,
    pub limit: DeductionLimit,
    /// Additional limit for senior citizens, where the scheme has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senior_citizen_limit: Option<DeductionLimit>,
    /// Never empty once loaded
    pub investments: Vec<InvestmentOption>,
}

/// Eligibility rule for one scheme
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityRule {
    pub scheme_id: String,
    /// Informational only
    pub eligible_person: String,
    pub max_age: AgeLimit,
    pub income_limit: IncomeLimit,
}

impl EligibilityRule {
    /// A rule that admits everyone, used for schemes without an explicit rule
    pub fn unrestricted(scheme_id: impl Into<String>) -> Self {
        Self {
            scheme_id: scheme_id.into(),
            eligible_person: String::new(),
            max_age: AgeLimit::NoLimit,
            income_limit: IncomeLimit::NoLimit,
        }
    }

    pub fn admits_age(&self, age: u32) -> bool {
        self.max_age.admits(age)
    }
}

/// Income tax bracket, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBracket {
    NoTax,
    FivePercent,
    TwentyPercent,
    ThirtyPercent,
}

impl TaxBracket {
    pub const ALL: [TaxBracket; 4] = [
        TaxBracket::NoTax,
        TaxBracket::FivePercent,
        TaxBracket::TwentyPercent,
        TaxBracket::ThirtyPercent,
    ];

    /// User-facing bracket name
    pub fn label(&self) -> &'static str {
        match self {
            TaxBracket::NoTax => "No Tax",
            TaxBracket::FivePercent => "5% Tax Bracket",
            TaxBracket::TwentyPercent => "20% Tax Bracket",
            TaxBracket::ThirtyPercent => "30% Tax Bracket",
        }
    }
}

impl fmt::Display for TaxBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
