//! Static catalog of tracked assets.
//!
//! Currencies come from the rate table on chande.net, one `<th>CODE</th>`
//! row per currency, already quoted in toman. Gold and coin prices come from
//! individual tgju.org profile pages, quoted in rial. The TGJU dollar page is
//! kept as a cross-check for the chande USD quote.

use super::asset::{Asset, AssetCategory};
use super::config::SourcesConfig;
use super::extract::ExtractionStrategy;
use super::units::UnitConversion;
use anyhow::{Context, Result, bail};
use std::collections::HashSet;

const TOMAN: &str = "تومان";

const TGJU_PRIMARY: &str = r#"(?is)<td\s+class=["']info-price["'][^>]*>([\d,]+)</td>"#;
const TGJU_FALLBACK: &str = r"(?is)<td[^>]*>([\d,]+)</td>";

/// (key, code, title)
const CURRENCIES: [(&str, &str, &str); 4] = [
    ("usd", "USD", "دلار آمریکا"),
    ("eur", "EUR", "یورو"),
    ("gbp", "GBP", "پوند"),
    ("aed", "AED", "درهم"),
];

/// (key, profile slug, title, cross-checked key)
const CURRENCY_CROSS_CHECKS: [(&str, &str, &str, &str); 1] =
    [("usd_tgju", "price_dollar_rl", "دلار آمریکا (TGJU)", "usd")];

/// (key, profile slug, title)
const GOLD: [(&str, &str, &str); 3] = [
    ("geram18", "geram18", "طلا 18 عیار"),
    ("mithqal", "mesghal", "مثقال طلا"),
    ("geram24", "geram24", "طلای ۲۴ عیار"),
];

const COINS: [(&str, &str, &str); 5] = [
    ("emami", "sekee", "سکه امامی"),
    ("bahar_azadi", "sekeb", "سکه بهار آزادی"),
    ("nim", "nim", "نیم سکه"),
    ("rob", "rob", "ربع سکه"),
    ("gerami", "gerami", "سکه گرمی"),
];

fn chande_strategy(code: &str) -> Result<ExtractionStrategy, regex::Error> {
    let code = regex::escape(code);
    let primary = format!(r"(?is)<th[^>]*>\s*{code}\s*</th>.*?<td[^>]*>(.*?)</td>");
    // Looser: the first number following the code within the same stretch of markup.
    let fallback = format!(r"(?is)\b{code}\b[^0-9۰-۹]{{0,200}}?([0-9۰-۹][0-9۰-۹,٬]*)");
    ExtractionStrategy::new(&primary, Some(&fallback))
}

fn tgju_strategy() -> Result<ExtractionStrategy, regex::Error> {
    ExtractionStrategy::new(TGJU_PRIMARY, Some(TGJU_FALLBACK))
}

fn tgju_url(base_url: &str, slug: &str) -> String {
    format!("{}/profile/{}", base_url.trim_end_matches('/'), slug)
}

#[derive(Debug, Clone)]
pub struct AssetRegistry {
    assets: Vec<Asset>,
}

impl AssetRegistry {
    /// Builds the default catalog against the configured source hosts.
    pub fn new(sources: &SourcesConfig) -> Result<Self> {
        let mut assets = Vec::new();
        let chande_url = sources.chande.base_url.clone();
        let tgju_base = sources.tgju.base_url.as_str();

        for (key, code, title) in CURRENCIES {
            assets.push(Asset {
                key: key.to_string(),
                title: title.to_string(),
                unit: TOMAN.to_string(),
                category: AssetCategory::Currency,
                source_url: chande_url.clone(),
                source_identifier: code.to_string(),
                strategy: chande_strategy(code)
                    .with_context(|| format!("Invalid pattern for currency {code}"))?,
                conversion: UnitConversion::None,
                cross_check_of: None,
            });
        }

        for (key, slug, title, of) in CURRENCY_CROSS_CHECKS {
            let mut asset = tgju_asset(tgju_base, key, slug, title, AssetCategory::Currency)?;
            asset.cross_check_of = Some(of.to_string());
            assets.push(asset);
        }

        for (key, slug, title) in GOLD {
            assets.push(tgju_asset(tgju_base, key, slug, title, AssetCategory::Gold)?);
        }
        for (key, slug, title) in COINS {
            assets.push(tgju_asset(tgju_base, key, slug, title, AssetCategory::Coin)?);
        }

        Self::from_assets(assets)
    }

    /// Wraps a custom catalog. Keys must be unique.
    pub fn from_assets(assets: Vec<Asset>) -> Result<Self> {
        let mut seen = HashSet::new();
        for asset in &assets {
            if !seen.insert(asset.key.as_str()) {
                bail!("Duplicate asset key: {}", asset.key);
            }
        }
        Ok(Self { assets })
    }

    pub fn all(&self) -> &[Asset] {
        &self.assets
    }

    pub fn get(&self, key: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.key == key)
    }

    pub fn by_category(&self, category: AssetCategory) -> Vec<&Asset> {
        self.assets
            .iter()
            .filter(|a| a.category == category)
            .collect()
    }

    /// Currencies that take part in the rate table; cross-checks are left out.
    pub fn rate_currencies(&self) -> Vec<&Asset> {
        self.assets
            .iter()
            .filter(|a| a.category == AssetCategory::Currency && !a.is_cross_check())
            .collect()
    }
}

fn tgju_asset(
    base_url: &str,
    key: &str,
    slug: &str,
    title: &str,
    category: AssetCategory,
) -> Result<Asset> {
    Ok(Asset {
        key: key.to_string(),
        title: title.to_string(),
        unit: TOMAN.to_string(),
        category,
        source_url: tgju_url(base_url, slug),
        source_identifier: slug.to_string(),
        strategy: tgju_strategy().context("Invalid TGJU pattern")?,
        conversion: UnitConversion::RialToToman,
        cross_check_of: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::extract;
    use crate::core::quote::Quote;

    fn registry() -> AssetRegistry {
        AssetRegistry::new(&SourcesConfig::default()).unwrap()
    }

    #[test]
    fn test_default_catalog() {
        let registry = registry();
        assert_eq!(registry.by_category(AssetCategory::Currency).len(), 5);
        assert_eq!(registry.by_category(AssetCategory::Gold).len(), 3);
        assert_eq!(registry.by_category(AssetCategory::Coin).len(), 5);

        let keys: Vec<_> = registry.rate_currencies().iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["usd", "eur", "gbp", "aed"]);

        let cross = registry.get("usd_tgju").unwrap();
        assert_eq!(cross.cross_check_of.as_deref(), Some("usd"));
        assert_eq!(cross.source_url, "https://www.tgju.org/profile/price_dollar_rl");
        assert_eq!(cross.conversion, UnitConversion::RialToToman);

        let mithqal = registry.get("mithqal").unwrap();
        assert_eq!(mithqal.source_url, "https://www.tgju.org/profile/mesghal");
        assert_eq!(
            registry.get("usd").unwrap().source_url,
            crate::core::config::DEFAULT_CHANDE_URL
        );
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let registry = registry();
        let mut assets = registry.all().to_vec();
        assets.push(assets[0].clone());
        let err = AssetRegistry::from_assets(assets).unwrap_err();
        assert!(err.to_string().contains("Duplicate asset key: usd"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        assert_eq!(tgju_url("http://localhost:8080/", "nim"), "http://localhost:8080/profile/nim");
    }

    #[test]
    fn test_chande_patterns() {
        let strategy = chande_strategy("EUR").unwrap();
        let html = r#"
            <table>
              <tr><th class="code">USD</th><td class="sell">58,200</td></tr>
              <tr><th class="code">EUR</th><td class="sell">62,750</td></tr>
            </table>"#;
        assert_eq!(extract(Some(html), &strategy, "eur"), Quote::Price(62750.0));

        // Layout changed to divs: only the fallback matches.
        let html = r#"<div class="row"><span>EUR</span><span>63,100</span></div>"#;
        assert_eq!(extract(Some(html), &strategy, "eur"), Quote::Price(63100.0));
    }
}
