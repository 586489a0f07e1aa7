//! Prompt construction for company ethics assessments.
//!
//! The prompt is a pure function of the company record so repeated runs
//! over unchanged data send identical requests.

use serde::Serialize;

use crate::company::{Company, MAX_SCORE, MIN_SCORE};

/// Upper bound on the justification length requested from the model, in words.
pub const MAX_REASON_WORDS: usize = 100;

/// A system/user message pair sent to the completion model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Build the assessment prompt for a company.
///
/// The user message always names the company; the ticker and the previous
/// score are included only when present.
pub fn build_prompt(company: &Company) -> Prompt {
    let system = format!(
        "You are EthixAI, an analyst that assesses the ethical practices of companies. \
         You score companies on a scale from {MIN_SCORE} to {MAX_SCORE}, where higher scores \
         indicate better ethical performance. Consider environmental sustainability, \
         labor practices, corporate governance, data privacy, and social impact."
    );

    let mut user = format!("Company name: {}.", company.name.trim());
    if let Some(ticker) = company.ticker.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        user.push_str(&format!(" Ticker: {ticker}."));
    }
    if let Some(previous) = company.ethics_score {
        user.push_str(&format!(" Previous ethics score: {previous}."));
    }
    user.push_str(&format!(
        " Respond with a JSON object with two keys: \"score\" (an integer between \
         {MIN_SCORE} and {MAX_SCORE}) and \"reason\" (a plain-English explanation of \
         no more than {MAX_REASON_WORDS} words)."
    ));

    Prompt { system, user }
}
