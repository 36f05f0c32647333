use super::asset::Asset;
use super::extract::extract;
use super::quote::{PriceMapping, Quote};
use super::source::DocumentSource;
use futures::future::join_all;
use tracing::{debug, info, instrument};

/// Runs fetch, extract and unit conversion for one asset.
#[instrument(name = "QuotePipeline", skip_all, fields(asset = %asset.key))]
pub async fn fetch_quote(asset: &Asset, source: &dyn DocumentSource) -> Quote {
    let document = source.fetch(&asset.source_url).await;
    let quote = match &document {
        Ok(text) => extract(Some(text.as_str()), &asset.strategy, &asset.key),
        // Keep the network reason rather than reporting a missing document.
        Err(reason) => Quote::Failed(reason.clone()),
    };
    asset.conversion.apply(quote)
}

/// Fetches every asset concurrently and collects one quote per asset key.
///
/// A failing asset only affects its own entry; the mapping is returned once
/// every pipeline has settled. `on_settled` is called as each one finishes.
pub async fn aggregate<'a, I>(
    assets: I,
    source: &dyn DocumentSource,
    on_settled: &(dyn Fn() + Sync),
) -> PriceMapping
where
    I: IntoIterator<Item = &'a Asset>,
{
    let pipelines = assets.into_iter().map(|asset| async move {
        let quote = fetch_quote(asset, source).await;
        on_settled();
        (asset.key.clone(), quote)
    });

    let prices: PriceMapping = join_all(pipelines).await.into_iter().collect();

    let failed = prices.values().filter(|q| q.is_failed()).count();
    info!(total = prices.len(), failed, "Batch settled");
    debug!(?prices, "Aggregated prices");
    prices
}
