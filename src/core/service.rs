//! Price operations consumed by the presentation layer.
//!
//! None of these fail: unavailable values are carried inside the returned
//! mappings as [`Quote::Failed`](super::quote::Quote::Failed) or `None`.

use super::aggregate::aggregate;
use super::asset::AssetCategory;
use super::config::AppConfig;
use super::quote::{PriceMapping, RateMapping};
use super::rates::normalize;
use super::refresh::{RefreshSlot, Snapshot};
use super::registry::AssetRegistry;
use super::source::DocumentSource;
use crate::providers::http::HttpFetcher;
use anyhow::{Result, bail};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct PriceService {
    registry: AssetRegistry,
    source: Arc<dyn DocumentSource>,
    base_currency: String,
    price_slots: HashMap<AssetCategory, RefreshSlot<PriceMapping>>,
    rate_slot: RefreshSlot<RateMapping>,
}

impl PriceService {
    pub fn new(
        registry: AssetRegistry,
        source: Arc<dyn DocumentSource>,
        base_currency: &str,
    ) -> Result<Self> {
        if !registry
            .rate_currencies()
            .iter()
            .any(|a| a.key == base_currency)
        {
            bail!("Unknown base currency: {}", base_currency);
        }

        Ok(Self {
            registry,
            source,
            base_currency: base_currency.to_string(),
            price_slots: AssetCategory::ALL
                .into_iter()
                .map(|c| (c, RefreshSlot::new()))
                .collect(),
            rate_slot: RefreshSlot::new(),
        })
    }

    /// Wires the default registry to an HTTP fetcher as configured.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let registry = AssetRegistry::new(&config.sources)?;
        let fetcher = HttpFetcher::new(Duration::from_secs(config.timeout_secs), config.retries)?;
        Self::new(registry, Arc::new(fetcher), &config.base_currency)
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// Prices of every currency, cross-check quotes included.
    pub async fn get_currency_prices(&self) -> PriceMapping {
        self.get_asset_prices(AssetCategory::Currency).await
    }

    pub async fn get_currency_rates(&self) -> RateMapping {
        self.currency_rates(&|| {}).await
    }

    pub async fn get_asset_prices(&self, category: AssetCategory) -> PriceMapping {
        self.asset_prices(category, &|| {}).await
    }

    /// Runs a price batch for `category` and publishes it unless a newer
    /// batch for the same category was started meanwhile.
    pub async fn refresh_prices(
        &self,
        category: AssetCategory,
        on_settled: &(dyn Fn() + Sync),
    ) -> Option<Snapshot<PriceMapping>> {
        let slot = &self.price_slots[&category];
        let token = slot.begin();
        info!(%category, batch = token.id(), "Refreshing prices");
        let prices = self.asset_prices(category, on_settled).await;
        slot.commit(token, prices).await
    }

    pub async fn refresh_rates(
        &self,
        on_settled: &(dyn Fn() + Sync),
    ) -> Option<Snapshot<RateMapping>> {
        let token = self.rate_slot.begin();
        info!(batch = token.id(), "Refreshing rates");
        let rates = self.currency_rates(on_settled).await;
        self.rate_slot.commit(token, rates).await
    }

    pub async fn latest_prices(&self, category: AssetCategory) -> Option<Snapshot<PriceMapping>> {
        self.price_slots[&category].latest().await
    }

    pub async fn latest_rates(&self) -> Option<Snapshot<RateMapping>> {
        self.rate_slot.latest().await
    }

    async fn asset_prices(
        &self,
        category: AssetCategory,
        on_settled: &(dyn Fn() + Sync),
    ) -> PriceMapping {
        let assets = self.registry.by_category(category);
        aggregate(assets, self.source.as_ref(), on_settled).await
    }

    async fn currency_rates(&self, on_settled: &(dyn Fn() + Sync)) -> RateMapping {
        let assets = self.registry.rate_currencies();
        let prices = aggregate(assets, self.source.as_ref(), on_settled).await;
        normalize(&prices, &self.base_currency)
    }
}
