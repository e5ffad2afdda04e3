//! Tax catalog loading
//!
//! Parses the YAML catalog into the core data model and validates it. A
//! catalog that fails validation is rejected as a whole.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use tax_assistant_core::{
    AgeLimit, DeductionLimit, EligibilityRule, IncomeLimit, InvestmentOption, Scheme,
};

/// Catalog shipped with the binary
const BUILTIN_CATALOG: &str = include_str!("../data/tax_catalog.yaml");

const UNLIMITED_SENTINELS: &[&str] = &["no upper limit", "no limit", "unlimited"];
const NO_AGE_LIMIT_SENTINELS: &[&str] = &["no age limit", "no limit", "unlimited"];
const NO_INCOME_LIMIT_SENTINELS: &[&str] = &["no income limit", "no limit", "unlimited"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    #[error("{scheme}: missing field '{field}'")]
    MissingField { scheme: String, field: String },

    #[error("{scheme}: invalid {field} '{value}'")]
    InvalidLimit {
        scheme: String,
        field: String,
        value: String,
    },

    #[error("{0}: scheme has no investment options")]
    NoInvestments(String),

    #[error("Duplicate scheme: {0}")]
    DuplicateScheme(String),

    #[error("Duplicate eligibility rule: {0}")]
    DuplicateRule(String),

    #[error("Eligibility rule for unknown scheme: {0}")]
    UnknownScheme(String),
}

impl From<CatalogError> for tax_assistant_core::Error {
    fn from(err: CatalogError) -> Self {
        tax_assistant_core::Error::CatalogLoad(err.to_string())
    }
}

/// Numeric limit or sentinel phrase
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLimit {
    Number(f64),
    Text(String),
}

impl RawLimit {
    fn describe(&self) -> String {
        match self {
            RawLimit::Number(value) => value.to_string(),
            RawLimit::Text(text) => text.clone(),
        }
    }

    /// `Some(None)` for a recognised sentinel, `Some(Some(n))` for a
    /// non-negative finite number, `None` otherwise
    fn parse(&self, sentinels: &[&str]) -> Option<Option<f64>> {
        match self {
            RawLimit::Number(value) if value.is_finite() && *value >= 0.0 => Some(Some(*value)),
            RawLimit::Number(_) => None,
            RawLimit::Text(text) => {
                let normalized = text.trim().to_lowercase();
                if sentinels.contains(&normalized.as_str()) {
                    Some(None)
                } else {
                    None
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    schemes: Vec<RawScheme>,
    #[serde(default)]
    eligibility: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawScheme {
    section: Option<String>,
    description: Option<String>,
    limit: Option<RawLimit>,
    #[serde(default)]
    additional_for_senior_citizens: Option<RawLimit>,
    #[serde(default)]
    investments: Vec<RawInvestment>,
}

#[derive(Debug, Deserialize)]
struct RawInvestment {
    name: Option<String>,
    description: Option<String>,
    benefit: Option<String>,
    application_steps: Option<Vec<String>>,
    application_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    section: Option<String>,
    #[serde(default)]
    eligible_person: String,
    max_age: Option<RawLimit>,
    income_limit: Option<RawLimit>,
}

fn required<T>(value: Option<T>, scheme: &str, field: &str) -> Result<T, CatalogError> {
    value.ok_or_else(|| CatalogError::MissingField {
        scheme: scheme.to_string(),
        field: field.to_string(),
    })
}

/// Present and not blank
fn required_text(value: Option<String>, scheme: &str, field: &str) -> Result<String, CatalogError> {
    required(value.filter(|v| !v.trim().is_empty()), scheme, field)
}

fn invalid_limit(scheme: &str, field: &str, raw: &RawLimit) -> CatalogError {
    CatalogError::InvalidLimit {
        scheme: scheme.to_string(),
        field: field.to_string(),
        value: raw.describe(),
    }
}

fn deduction_limit(raw: &RawLimit, scheme: &str, field: &str) -> Result<DeductionLimit, CatalogError> {
    match raw.parse(UNLIMITED_SENTINELS) {
        Some(Some(value)) => Ok(DeductionLimit::Amount(value)),
        Some(None) => Ok(DeductionLimit::Unlimited),
        None => Err(invalid_limit(scheme, field, raw)),
    }
}

fn age_limit(raw: &RawLimit, scheme: &str) -> Result<AgeLimit, CatalogError> {
    match raw.parse(NO_AGE_LIMIT_SENTINELS) {
        Some(Some(value)) if value.fract() == 0.0 && value <= u32::MAX as f64 => {
            Ok(AgeLimit::Max(value as u32))
        }
        Some(None) => Ok(AgeLimit::NoLimit),
        _ => Err(invalid_limit(scheme, "max_age", raw)),
    }
}

fn income_limit(raw: &RawLimit, scheme: &str) -> Result<IncomeLimit, CatalogError> {
    match raw.parse(NO_INCOME_LIMIT_SENTINELS) {
        Some(Some(value)) => Ok(IncomeLimit::Max(value)),
        Some(None) => Ok(IncomeLimit::NoLimit),
        None => Err(invalid_limit(scheme, "income_limit", raw)),
    }
}

fn build_investment(
    raw: RawInvestment,
    scheme: &str,
    index: usize,
) -> Result<InvestmentOption, CatalogError> {
    let field = |name: &str| format!("investments[{}].{}", index, name);
    let application_steps = required(raw.application_steps, scheme, &field("application_steps"))?;
    if application_steps.is_empty() || application_steps.iter().any(|s| s.trim().is_empty()) {
        return Err(CatalogError::MissingField {
            scheme: scheme.to_string(),
            field: field("application_steps"),
        });
    }

    Ok(InvestmentOption {
        name: required_text(raw.name, scheme, &field("name"))?,
        description: required_text(raw.description, scheme, &field("description"))?,
        benefit: required_text(raw.benefit, scheme, &field("benefit"))?,
        application_steps,
        application_link: required_text(
            raw.application_link,
            scheme,
            &field("application_link"),
        )?,
    })
}

fn build_scheme(raw: RawScheme, position: usize) -> Result<Scheme, CatalogError> {
    let id = raw
        .section
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CatalogError::MissingField {
            scheme: format!("schemes[{}]", position),
            field: "section".to_string(),
        })?;

    let description = required_text(raw.description, &id, "description")?;
    let limit = deduction_limit(&required(raw.limit, &id, "limit")?, &id, "limit")?;
    let senior_citizen_limit = raw
        .additional_for_senior_citizens
        .as_ref()
        .map(|raw| deduction_limit(raw, &id, "additional_for_senior_citizens"))
        .transpose()?;

    if raw.investments.is_empty() {
        return Err(CatalogError::NoInvestments(id));
    }
    let investments = raw
        .investments
        .into_iter()
        .enumerate()
        .map(|(index, inv)| build_investment(inv, &id, index))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scheme {
        id,
        description,
        limit,
        senior_citizen_limit,
        investments,
    })
}

fn build_rule(raw: RawRule, position: usize) -> Result<EligibilityRule, CatalogError> {
    let scheme_id = raw
        .section
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CatalogError::MissingField {
            scheme: format!("eligibility[{}]", position),
            field: "section".to_string(),
        })?;

    let max_age = match raw.max_age {
        Some(ref limit) => age_limit(limit, &scheme_id)?,
        None => AgeLimit::NoLimit,
    };
    let income_limit = match raw.income_limit {
        Some(ref limit) => income_limit(limit, &scheme_id)?,
        None => IncomeLimit::NoLimit,
    };

    Ok(EligibilityRule {
        scheme_id,
        eligible_person: raw.eligible_person,
        max_age,
        income_limit,
    })
}

/// Validated, immutable tax catalog
///
/// Schemes keep their source order. Every scheme has an eligibility rule;
/// schemes the source gives no rule for get an unrestricted one.
#[derive(Debug, Clone)]
pub struct TaxCatalog {
    schemes: Vec<Arc<Scheme>>,
    rules: HashMap<String, EligibilityRule>,
}

impl TaxCatalog {
    /// Catalog embedded in the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let catalog = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            schemes = catalog.len(),
            "Loaded tax catalog"
        );
        Ok(catalog)
    }

    /// Load from the file if given, otherwise the built-in catalog
    pub fn load_or_builtin(path: Option<&str>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog =
            serde_yaml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawCatalog) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut schemes = Vec::with_capacity(raw.schemes.len());
        for (position, raw_scheme) in raw.schemes.into_iter().enumerate() {
            let scheme = build_scheme(raw_scheme, position)?;
            if !seen.insert(scheme.id.clone()) {
                return Err(CatalogError::DuplicateScheme(scheme.id));
            }
            schemes.push(Arc::new(scheme));
        }

        let mut rules = HashMap::with_capacity(raw.eligibility.len());
        for (position, raw_rule) in raw.eligibility.into_iter().enumerate() {
            let rule = build_rule(raw_rule, position)?;
            if !seen.contains(&rule.scheme_id) {
                return Err(CatalogError::UnknownScheme(rule.scheme_id));
            }
            if rules.contains_key(&rule.scheme_id) {
                return Err(CatalogError::DuplicateRule(rule.scheme_id));
            }
            rules.insert(rule.scheme_id.clone(), rule);
        }

        for scheme in &schemes {
            if !rules.contains_key(&scheme.id) {
                tracing::warn!(scheme = %scheme.id, "No eligibility rule, scheme admits everyone");
                rules.insert(scheme.id.clone(), EligibilityRule::unrestricted(&scheme.id));
            }
        }

        if schemes.is_empty() {
            tracing::warn!("Tax catalog has no schemes");
        }

        Ok(Self { schemes, rules })
    }

    /// Schemes in presentation order
    pub fn schemes(&self) -> &[Arc<Scheme>] {
        &self.schemes
    }

    pub fn scheme(&self, id: &str) -> Option<&Arc<Scheme>> {
        self.schemes.iter().find(|s| s.id == id)
    }

    pub fn rule(&self, scheme_id: &str) -> Option<&EligibilityRule> {
        self.rules.get(scheme_id)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}
