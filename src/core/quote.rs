//! Quote values and the mappings handed to the presentation layer

use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Display;
use thiserror::Error;

/// Why a value could not be obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    #[error("timeout")]
    Timeout,

    #[error("http status {0}")]
    HttpStatus(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("no document")]
    NoDocument,

    #[error("pattern did not match")]
    NoMatch,

    #[error("not a number: {0:?}")]
    NotNumeric(String),
}

/// Coarse classification of a [`FailureReason`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Parse,
}

impl FailureReason {
    pub fn kind(&self) -> FailureKind {
        match self {
            FailureReason::Timeout | FailureReason::HttpStatus(_) | FailureReason::Transport(_) => {
                FailureKind::Network
            }
            FailureReason::NoDocument | FailureReason::NoMatch | FailureReason::NotNumeric(_) => {
                FailureKind::Parse
            }
        }
    }
}

/// Outcome of one fetch+extract pipeline for a single asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Quote {
    Price(f64),
    Failed(FailureReason),
}

impl Quote {
    pub fn price(&self) -> Option<f64> {
        match self {
            Quote::Price(p) => Some(*p),
            Quote::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Quote::Failed(_))
    }
}

impl From<Result<f64, FailureReason>> for Quote {
    fn from(result: Result<f64, FailureReason>) -> Self {
        match result {
            Ok(price) => Quote::Price(price),
            Err(reason) => Quote::Failed(reason),
        }
    }
}

impl Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quote::Price(p) => write!(f, "{p}"),
            Quote::Failed(reason) => write!(f, "error ({reason})"),
        }
    }
}

/// Asset key to quote, one entry per asset in a batch.
pub type PriceMapping = HashMap<String, Quote>;

/// Currency key to rate against the base currency.
pub type RateMapping = HashMap<String, Option<f64>>;
