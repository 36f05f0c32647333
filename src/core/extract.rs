//! Targeted numeric extraction from third-party markup.
//!
//! Each asset carries an [`ExtractionStrategy`]: a primary pattern written
//! against the page layout we know about, and an optional looser fallback
//! used when the primary stops matching. Both patterns must expose the value
//! as capture group 1.

use super::quote::{FailureReason, Quote};
use regex::Regex;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ExtractionStrategy {
    primary: Regex,
    fallback: Option<Regex>,
}

impl ExtractionStrategy {
    pub fn new(primary: &str, fallback: Option<&str>) -> Result<Self, regex::Error> {
        Ok(Self {
            primary: Regex::new(primary)?,
            fallback: fallback.map(Regex::new).transpose()?,
        })
    }
}

/// Pulls a number for `field` out of `text`.
///
/// A missing document fails immediately. Otherwise the primary pattern is
/// tried first and the fallback, if any, only when the primary yields no
/// usable number.
pub fn extract(text: Option<&str>, strategy: &ExtractionStrategy, field: &str) -> Quote {
    let Some(text) = text else {
        debug!(field, "No document to extract from");
        return Quote::Failed(FailureReason::NoDocument);
    };

    let primary = match_number(text, &strategy.primary);
    let result = match (primary, &strategy.fallback) {
        (Ok(value), _) => Ok(value),
        (Err(reason), Some(fallback)) => {
            warn!(field, %reason, "Primary pattern failed, trying fallback");
            match_number(text, fallback)
        }
        (Err(reason), None) => Err(reason),
    };

    match &result {
        Ok(value) => debug!(field, value, "Extracted price"),
        Err(reason) => warn!(field, %reason, "Could not extract price"),
    }
    result.into()
}

fn match_number(text: &str, pattern: &Regex) -> Result<f64, FailureReason> {
    let captured = pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .ok_or(FailureReason::NoMatch)?;
    parse_number(captured.as_str())
}

/// Parses the leading number of a captured cell.
///
/// Thousands separators and surrounding whitespace are dropped and
/// Persian/Arabic-Indic digits are read as ASCII. Trailing text such as a
/// unit label is ignored.
pub fn parse_number(raw: &str) -> Result<f64, FailureReason> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '\u{066C}'))
        .map(normalize_digit)
        .collect();

    let prefix = numeric_prefix(&cleaned);
    let value: f64 = prefix
        .parse()
        .map_err(|_| FailureReason::NotNumeric(raw.trim().to_string()))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(FailureReason::NotNumeric(raw.trim().to_string()))
    }
}

fn normalize_digit(c: char) -> char {
    match c {
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        '\u{066B}' => '.',
        _ => c,
    }
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    &s[..end]
}
