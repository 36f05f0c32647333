//! Priced assets and their categories

use super::extract::ExtractionStrategy;
use super::units::UnitConversion;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum AssetCategory {
    Currency,
    Gold,
    Coin,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 3] = [
        AssetCategory::Currency,
        AssetCategory::Gold,
        AssetCategory::Coin,
    ];
}

impl Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AssetCategory::Currency => "currency",
                AssetCategory::Gold => "gold",
                AssetCategory::Coin => "coin",
            }
        )
    }
}

impl FromStr for AssetCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "currency" | "currencies" => Ok(AssetCategory::Currency),
            "gold" => Ok(AssetCategory::Gold),
            "coin" | "coins" => Ok(AssetCategory::Coin),
            _ => Err(anyhow::anyhow!("Invalid asset category: {}", s)),
        }
    }
}

/// A single priced item and where to find its price.
#[derive(Debug, Clone)]
pub struct Asset {
    pub key: String,
    pub title: String,
    pub unit: String,
    pub category: AssetCategory,
    pub source_url: String,
    /// Token used to locate the value in the document (a table header code
    /// or a page slug).
    pub source_identifier: String,
    pub strategy: ExtractionStrategy,
    pub conversion: UnitConversion,
    /// Set when this asset is a second-source quote for another asset's
    /// field. Such entries are reported beside the primary, never merged.
    pub cross_check_of: Option<String>,
}

impl Asset {
    pub fn is_cross_check(&self) -> bool {
        self.cross_check_of.is_some()
    }
}
