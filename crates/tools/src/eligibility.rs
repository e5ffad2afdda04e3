//! Income brackets and scheme eligibility

use std::sync::Arc;

use tax_assistant_config::TaxCatalog;
use tax_assistant_core::{Error, Result, Scheme, TaxBracket};

/// Upper cutoffs (inclusive) of the lower brackets, in INR
const BRACKET_CEILINGS: [(f64, TaxBracket); 3] = [
    (250_000.0, TaxBracket::NoTax),
    (500_000.0, TaxBracket::FivePercent),
    (1_000_000.0, TaxBracket::TwentyPercent),
];

fn check_income(income: f64) -> Result<()> {
    if !income.is_finite() {
        return Err(Error::invalid_input("income must be a finite number"));
    }
    if income < 0.0 {
        return Err(Error::invalid_input("income must not be negative"));
    }
    Ok(())
}

/// Map an annual income to its tax bracket
///
/// Every finite non-negative income falls in exactly one bracket, and higher
/// incomes never fall in a lower bracket.
pub fn classify_income(income: f64) -> Result<TaxBracket> {
    check_income(income)?;
    Ok(BRACKET_CEILINGS
        .iter()
        .find(|(ceiling, _)| income <= *ceiling)
        .map(|(_, bracket)| *bracket)
        .unwrap_or(TaxBracket::ThirtyPercent))
}

/// Recommends schemes from a shared catalog
///
/// Stateless apart from the catalog; safe to share between sessions.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    catalog: Arc<TaxCatalog>,
}

impl EligibilityEngine {
    pub fn new(catalog: Arc<TaxCatalog>) -> Self {
        Self { catalog }
    }

    pub fn classify_income(&self, income: f64) -> Result<TaxBracket> {
        classify_income(income)
    }

    /// Schemes whose eligibility rule admits `age`, in catalog order
    ///
    /// Income is validated but does not filter: the catalog's income limits
    /// are reference data only. Ages are whole years, so negative ages are
    /// rejected when the answer is parsed.
    pub fn recommend(&self, income: f64, age: u32) -> Result<Vec<Arc<Scheme>>> {
        check_income(income)?;

        let schemes: Vec<Arc<Scheme>> = self
            .catalog
            .schemes()
            .iter()
            .filter(|scheme| {
                self.catalog
                    .rule(&scheme.id)
                    .map_or(true, |rule| rule.admits_age(age))
            })
            .cloned()
            .collect();

        tracing::debug!(
            age,
            recommended = schemes.len(),
            total = self.catalog.len(),
            "Recommended schemes"
        );
        Ok(schemes)
    }
}
