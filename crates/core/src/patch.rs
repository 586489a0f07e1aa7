//! Admin patch payload and its validation rules.
//!
//! The patch endpoint only accepts the fields listed on [`CompanyPatch`];
//! anything else is rejected during deserialization. A score and its
//! justification must always travel together.

use serde::{Deserialize, Deserializer};

use crate::company::{MAX_SCORE, MIN_SCORE};
use crate::error::CoreError;

/// Maximum length for a company name in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for a ticker symbol in characters.
pub const MAX_TICKER_LENGTH: usize = 16;

/// Fields an authorized caller may change on a company.
///
/// `ticker` distinguishes "absent" (`None`) from "explicitly null"
/// (`Some(None)`), which clears the column.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub ticker: Option<Option<String>>,
    #[serde(default)]
    pub ethics_score: Option<i32>,
    #[serde(default)]
    pub source_reason: Option<String>,
}

/// Wrap any present value (including `null`) in `Some`.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl CompanyPatch {
    /// `true` when the payload carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.ticker.is_none()
            && self.ethics_score.is_none()
            && self.source_reason.is_none()
    }

    /// Validate the patch against the field rules.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.is_empty() {
            return Err(CoreError::Validation(
                "No fields provided for update".to_string(),
            ));
        }

        if let Some(name) = &self.name {
            validate_name(name)?;
        }

        if let Some(Some(ticker)) = &self.ticker {
            validate_ticker(ticker)?;
        }

        match (self.ethics_score, &self.source_reason) {
            (Some(score), Some(reason)) => {
                validate_score(score)?;
                if reason.trim().is_empty() {
                    return Err(CoreError::Validation(
                        "source_reason must not be empty".to_string(),
                    ));
                }
            }
            (None, None) => {}
            _ => {
                return Err(CoreError::Validation(
                    "ethics_score and source_reason must be updated together".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Validate a company name: non-blank and within length limit.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a ticker symbol: non-blank and within length limit.
pub fn validate_ticker(ticker: &str) -> Result<(), CoreError> {
    let trimmed = ticker.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "ticker must not be empty (send null to clear it)".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_TICKER_LENGTH {
        return Err(CoreError::Validation(format!(
            "ticker exceeds maximum length of {MAX_TICKER_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an ethics score: must lie within `MIN_SCORE..=MAX_SCORE`.
pub fn validate_score(score: i32) -> Result<(), CoreError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(CoreError::Validation(format!(
            "ethics_score must be between {MIN_SCORE} and {MAX_SCORE} (got {score})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CompanyPatch {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn empty_payload_is_rejected() {
        let patch = parse("{}");
        assert!(patch.is_empty());
        let err = patch.validate().unwrap_err();
        assert!(err.to_string().contains("No fields provided"));
    }

    #[test]
    fn unknown_field_fails_to_deserialize() {
        let result = serde_json::from_str::<CompanyPatch>(r#"{"id":"other"}"#);
        assert!(result.is_err());
        let result = serde_json::from_str::<CompanyPatch>(r#"{"last_updated":"2024-01-01"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn null_ticker_is_distinguished_from_absent() {
        assert_eq!(parse(r#"{"ticker":null}"#).ticker, Some(None));
        assert_eq!(parse(r#"{"name":"Acme"}"#).ticker, None);
        assert!(parse(r#"{"ticker":null}"#).validate().is_ok());
    }

    #[test]
    fn score_without_reason_is_rejected() {
        let err = parse(r#"{"ethics_score":50}"#).validate().unwrap_err();
        assert!(err.to_string().contains("together"));

        let err = parse(r#"{"source_reason":"fine"}"#).validate().unwrap_err();
        assert!(err.to_string().contains("together"));
    }

    #[test]
    fn score_pair_within_range_is_accepted() {
        let patch = parse(r#"{"ethics_score":0,"source_reason":"Poor record."}"#);
        assert!(patch.validate().is_ok());
        let patch = parse(r#"{"ethics_score":100,"source_reason":"Exemplary."}"#);
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let patch = parse(r#"{"ethics_score":101,"source_reason":"Too high"}"#);
        assert!(patch.validate().is_err());
        let patch = parse(r#"{"ethics_score":-1,"source_reason":"Too low"}"#);
        assert!(patch.validate().is_err());
    }

    #[test]
    fn blank_reason_is_rejected() {
        let patch = parse(r#"{"ethics_score":40,"source_reason":"   "}"#);
        assert!(patch.validate().is_err());
    }

    #[test]
    fn blank_name_and_ticker_are_rejected() {
        assert!(parse(r#"{"name":"  "}"#).validate().is_err());
        assert!(parse(r#"{"ticker":""}"#).validate().is_err());
        assert!(parse(r#"{"ticker":"WAYTOOLONGTICKERSYMBOL"}"#)
            .validate()
            .is_err());
    }
}
