//! Extraction of a score and justification from free-form model output.
//!
//! The model is asked for a JSON object, but replies are not guaranteed to
//! follow instructions. [`parse_assessment`] accepts, in order of preference:
//!
//! 1. A JSON object (optionally inside a markdown code fence) carrying
//!    `score` and `reason`.
//! 2. Free text with a labelled score, e.g. `Score: 72. Reasonable labor practices.`
//! 3. Free text whose first standalone integer is the score.
//!
//! Scale phrases (`out of 100`, `(0-100)`, `/100`, `0 to 100`) are ignored
//! when looking for the score.
//!
//! It never guesses: a missing, fractional, out-of-range or contradictory
//! score, or an empty justification, is a [`ScoreParseError`].

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::company::{MAX_SCORE, MIN_SCORE};

/// Longest justification stored, in characters.
pub const MAX_REASON_LENGTH: usize = 2_000;

/// `score` label followed (within a short gap) by a number.
static LABELED_SCORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bscore\b[^0-9\-\n]{0,20}?(-?\d+(?:\.\d+)?)").expect("valid regex")
});

/// A restatement of the 0-100 scale, optionally parenthesised.
static SCALE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\(\s*)?(?:\bout\s+of\s+100\b|\b0\s*(?:-|–|to)\s*100\b|/\s*100\b)(?:\s*\))?",
    )
    .expect("valid regex")
});

/// A standalone number: at the start of the text or after whitespace or `:(`.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s:(])(-?\d+(?:\.\d+)?)").expect("valid regex")
});

/// JSON keys accepted for the score.
const SCORE_KEYS: &[&str] = &["score", "ethics_score"];

/// JSON keys accepted for the justification.
const REASON_KEYS: &[&str] = &["reason", "justification", "source_reason"];

/// Leading fragments stripped from a justification.
const REASON_PREFIXES: &[&str] = &["/100", "/ 100", "out of 100", "reason:", "justification:"];

/// A validated score with its justification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub score: i32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreParseError {
    #[error("model response contains no score")]
    MissingScore,

    #[error("score {0} is outside the valid range {min}..={max}", min = MIN_SCORE, max = MAX_SCORE)]
    OutOfRange(String),

    #[error("score {0} is not an integer")]
    NotAnInteger(String),

    #[error("model response gives conflicting scores: {0}")]
    Ambiguous(String),

    #[error("model response contains no justification")]
    MissingReason,
}

/// Parse a model response into an [`Assessment`].
pub fn parse_assessment(text: &str) -> Result<Assessment, ScoreParseError> {
    let text = strip_code_fence(text.trim());

    if let Some(map) = extract_json_object(text) {
        return parse_json_assessment(&map);
    }

    parse_free_text(text)
}

// ---------------------------------------------------------------------------
// JSON responses
// ---------------------------------------------------------------------------

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening fence line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn parse_json_assessment(map: &Map<String, Value>) -> Result<Assessment, ScoreParseError> {
    let raw_score = SCORE_KEYS
        .iter()
        .find_map(|k| map.get(*k))
        .filter(|v| !v.is_null())
        .ok_or(ScoreParseError::MissingScore)?;

    let score = match raw_score {
        Value::Number(n) => match n.as_i64() {
            Some(i) => check_range(i, &n.to_string())?,
            None => parse_number(&n.to_string())?,
        },
        Value::String(s) => parse_number(s.trim())?,
        other => return Err(ScoreParseError::NotAnInteger(other.to_string())),
    };

    let reason = REASON_KEYS
        .iter()
        .find_map(|k| map.get(*k))
        .and_then(Value::as_str)
        .unwrap_or_default();

    Ok(Assessment {
        score,
        reason: finish_reason(reason)?,
    })
}

// ---------------------------------------------------------------------------
// Free-text responses
// ---------------------------------------------------------------------------

fn parse_free_text(text: &str) -> Result<Assessment, ScoreParseError> {
    // Same byte offsets as `text`, with scale phrases blanked out.
    let masked = mask_scales(text);

    let labelled: Vec<Captures> = LABELED_SCORE_RE.captures_iter(&masked).collect();
    let fallback;
    let caps = match labelled.first() {
        Some(first) => {
            let distinct = labelled
                .iter()
                .filter(|c| c[1] != first[1])
                .map(|c| c[1].to_string())
                .next();
            if let Some(other) = distinct {
                return Err(ScoreParseError::Ambiguous(format!("{} and {other}", &first[1])));
            }
            first
        }
        None => {
            fallback = NUMBER_RE
                .captures(&masked)
                .ok_or(ScoreParseError::MissingScore)?;
            &fallback
        }
    };

    // Group 1 is the number; group 0 spans the label (or separator) too.
    let whole = caps.get(0).ok_or(ScoreParseError::MissingScore)?;
    let number = caps.get(1).ok_or(ScoreParseError::MissingScore)?;

    let score = parse_number(number.as_str())?;

    let after = trim_reason_start(&text[number.end()..]);
    let reason = if after.is_empty() {
        trim_reason_end(&text[..whole.start()])
    } else {
        after
    };

    Ok(Assessment {
        score,
        reason: finish_reason(reason)?,
    })
}

fn mask_scales(text: &str) -> Cow<'_, str> {
    SCALE_RE.replace_all(text, |caps: &Captures| " ".repeat(caps[0].len()))
}

fn trim_reason_start(mut s: &str) -> &str {
    loop {
        let before = s;
        s = s.trim_start_matches(|c: char| {
            c.is_whitespace() || matches!(c, '.' | ':' | '-' | ',' | ';' | ')' | '%' | '*')
        });
        for prefix in REASON_PREFIXES {
            if let Some(rest) = strip_prefix_ignore_case(s, prefix) {
                s = rest;
            }
        }
        if s.len() == before.len() {
            return s;
        }
    }
}

fn trim_reason_end(s: &str) -> &str {
    s.trim_end_matches(|c: char| {
        c.is_whitespace() || matches!(c, ':' | '-' | ',' | ';' | '(' | '*')
    })
    .trim_start()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Shared validation
// ---------------------------------------------------------------------------

fn parse_number(raw: &str) -> Result<i32, ScoreParseError> {
    if raw.is_empty() {
        return Err(ScoreParseError::MissingScore);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return check_range(i, raw);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => {
            if f < f64::from(MIN_SCORE) || f > f64::from(MAX_SCORE) {
                Err(ScoreParseError::OutOfRange(raw.to_string()))
            } else {
                Ok(f as i32)
            }
        }
        Ok(_) => Err(ScoreParseError::NotAnInteger(raw.to_string())),
        // All-digit strings that overflow i64 are simply out of range.
        Err(_) if raw.trim_start_matches('-').chars().all(|c| c.is_ascii_digit()) => {
            Err(ScoreParseError::OutOfRange(raw.to_string()))
        }
        Err(_) => Err(ScoreParseError::NotAnInteger(raw.to_string())),
    }
}

fn check_range(value: i64, raw: &str) -> Result<i32, ScoreParseError> {
    if value < i64::from(MIN_SCORE) || value > i64::from(MAX_SCORE) {
        return Err(ScoreParseError::OutOfRange(raw.to_string()));
    }
    Ok(value as i32)
}

fn finish_reason(reason: &str) -> Result<String, ScoreParseError> {
    let reason: String = reason.trim().chars().take(MAX_REASON_LENGTH).collect();
    let reason = reason.trim_end().to_string();
    if reason.is_empty() {
        return Err(ScoreParseError::MissingReason);
    }
    Ok(reason)
}
