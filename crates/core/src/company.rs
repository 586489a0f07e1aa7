//! The `Company` record and the change sets written back to the store.

use serde::{Deserialize, Serialize};

use crate::patch::CompanyPatch;
use crate::scoring::Assessment;
use crate::types::{CompanyId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest valid ethics score.
pub const MIN_SCORE: i32 = 0;

/// Highest valid ethics score.
pub const MAX_SCORE: i32 = 100;

/// Columns selected on every read, in response order.
pub const COLUMNS: &str = "id,name,ticker,ethics_score,source_reason,last_updated";

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `companies` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub ethics_score: Option<i32>,
    #[serde(default)]
    pub source_reason: Option<String>,
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Change sets
// ---------------------------------------------------------------------------

/// Columns to write in a single update.
///
/// Unset fields are omitted from the serialized body so the store leaves
/// them untouched. `ticker: Some(None)` serializes as `null` and clears the
/// column. `last_updated` is always written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethics_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_reason: Option<String>,
    pub last_updated: Timestamp,
}

impl CompanyChanges {
    /// Changes produced by a successful scoring run: score and reason together.
    pub fn scored(assessment: Assessment, now: Timestamp) -> Self {
        Self {
            name: None,
            ticker: None,
            ethics_score: Some(assessment.score),
            source_reason: Some(assessment.reason),
            last_updated: now,
        }
    }

    /// Changes requested through the admin patch endpoint.
    ///
    /// The patch must already have passed [`CompanyPatch::validate`].
    pub fn from_patch(patch: CompanyPatch, now: Timestamp) -> Self {
        Self {
            name: patch.name.map(|n| n.trim().to_string()),
            ticker: patch
                .ticker
                .map(|t| t.map(|t| t.trim().to_string())),
            ethics_score: patch.ethics_score,
            source_reason: patch.source_reason.map(|r| r.trim().to_string()),
            last_updated: now,
        }
    }

    /// Apply these changes to an in-memory record.
    pub fn apply_to(&self, company: &mut Company) {
        if let Some(name) = &self.name {
            company.name.clone_from(name);
        }
        if let Some(ticker) = &self.ticker {
            company.ticker.clone_from(ticker);
        }
        if let Some(score) = self.ethics_score {
            company.ethics_score = Some(score);
        }
        if let Some(reason) = &self.source_reason {
            company.source_reason = Some(reason.clone());
        }
        company.last_updated = Some(self.last_updated);
    }
}
