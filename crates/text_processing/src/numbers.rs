//! Free-text numeric fields
//!
//! Income, age and list choices arrive as whatever the user typed. Parsing
//! failures are `InvalidInput` so the dialogue can recover from them.

use once_cell::sync::Lazy;
use regex::Regex;

use tax_assistant_core::{Error, Result};

/// Optional currency prefix, then digits with optional Indian or western
/// thousands separators and an optional fraction
static INCOME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:rs\.?|inr|₹)?\s*(\d+(?:,\d{2,3})*(?:\.\d+)?)$").unwrap()
});

static AGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d{1,3})(?:\s*(?:years?|yrs?)(?:\s+old)?)?$").unwrap()
});

/// Oldest age accepted as a real answer
const MAX_AGE: u32 = 150;

/// Parse an annual income in INR, e.g. "600000", "Rs. 6,00,000", "₹ 1250000.50"
pub fn parse_income(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let digits = INCOME_PATTERN
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace(',', ""))
        .ok_or_else(|| Error::invalid_input(format!("not an income amount: '{}'", trimmed)))?;

    let income: f64 = digits
        .parse()
        .map_err(|_| Error::invalid_input(format!("not an income amount: '{}'", trimmed)))?;
    if !income.is_finite() {
        return Err(Error::invalid_input("income out of range"));
    }
    Ok(income)
}

/// Parse an age in whole years, e.g. "45" or "45 years"
pub fn parse_age(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    let age = AGE_PATTERN
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(|| Error::invalid_input(format!("not an age: '{}'", trimmed)))?;

    if age > MAX_AGE {
        return Err(Error::invalid_input(format!("age out of range: {}", age)));
    }
    Ok(age)
}

/// Parse a 1-based list choice. Range checking is up to the caller.
pub fn parse_choice(text: &str) -> Result<usize> {
    let trimmed = text.trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| Error::invalid_input(format!("not a number: '{}'", trimmed)))
}
