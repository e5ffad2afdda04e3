//! Replies that embed catalog data

use tax_assistant_core::{InvestmentOption, Scheme, TaxBracket};

/// "Based on your income of INR 600000, you fall under the '20% Tax Bracket'."
pub fn bracket_statement(income: f64, bracket: TaxBracket) -> String {
    format!(
        "Based on your income of INR {}, you fall under the '{}'.",
        income, bracket
    )
}

/// One numbered entry of the recommendation list
pub fn list_entry(position: usize, scheme: &Scheme) -> String {
    format!(
        "{}. Section: {}\n   Description: {}\n   Investment Limit: {}",
        position, scheme.id, scheme.description, scheme.limit
    )
}

/// Full details of a scheme: a header reply, then one reply per investment
pub fn scheme_details(scheme: &Scheme) -> Vec<String> {
    let mut header = format!(
        "Detailed Information about {}:\nDescription: {}\nInvestment Limit: {}",
        scheme.id, scheme.description, scheme.limit
    );
    if let Some(senior) = &scheme.senior_citizen_limit {
        header.push_str(&format!("\nAdditional Limit for Senior Citizens: {}", senior));
    }

    std::iter::once(header)
        .chain(scheme.investments.iter().map(investment_details))
        .collect()
}

fn investment_details(option: &InvestmentOption) -> String {
    let mut text = format!(
        "Investment: {}\nDescription: {}\nBenefit: {}\nApplication Steps:",
        option.name, option.description, option.benefit
    );
    for step in &option.application_steps {
        text.push_str("\n- ");
        text.push_str(step);
    }
    text.push_str("\nApplication Link: ");
    text.push_str(&option.application_link);
    text
}
