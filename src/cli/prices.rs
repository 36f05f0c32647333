use super::{OutputFormat, ui};
use crate::core::refresh::Snapshot;
use crate::core::{Asset, AssetCategory, PriceMapping, PriceService};
use anyhow::{Result, anyhow};
use chrono::Local;
use comfy_table::Cell;
use std::collections::BTreeMap;

fn category_title(category: AssetCategory) -> &'static str {
    match category {
        AssetCategory::Currency => "Currencies",
        AssetCategory::Gold => "Gold",
        AssetCategory::Coin => "Coins",
    }
}

/// Renders a price snapshot as a table, in registry order.
pub fn render_table(
    category: AssetCategory,
    assets: &[&Asset],
    snapshot: &Snapshot<PriceMapping>,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Asset"),
        ui::header_cell("Key"),
        ui::header_cell("Price"),
        ui::header_cell("Unit"),
        ui::header_cell("Note"),
    ]);

    for asset in assets {
        let price = snapshot
            .data
            .get(&asset.key)
            .map_or(ui::na_cell(true), ui::quote_cell);
        let note = asset
            .cross_check_of
            .as_ref()
            .map_or(String::new(), |of| format!("cross-check of {of}"));

        table.add_row(vec![
            Cell::new(&asset.title),
            Cell::new(&asset.key),
            price,
            Cell::new(&asset.unit),
            Cell::new(note),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text(category_title(category), ui::StyleType::Title)
    );
    output.push_str(&table.to_string());

    if !snapshot.data.is_empty() && snapshot.data.values().all(|q| q.is_failed()) {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text("No prices could be fetched.", ui::StyleType::Error)
        ));
    }

    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(
            &format!(
                "Updated {}",
                snapshot.fetched_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
            ),
            ui::StyleType::Subtle
        )
    ));
    output
}

pub fn render_json(category: AssetCategory, snapshot: &Snapshot<PriceMapping>) -> Result<String> {
    let prices: BTreeMap<_, _> = snapshot.data.iter().collect();
    let value = serde_json::json!({
        "category": category.to_string(),
        "batch": snapshot.batch.id(),
        "fetched_at": snapshot.fetched_at,
        "prices": prices,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

pub async fn run(
    service: &PriceService,
    category: AssetCategory,
    format: OutputFormat,
) -> Result<()> {
    let assets = service.registry().by_category(category);

    let pb = ui::new_progress_bar(assets.len() as u64, true);
    pb.set_message(format!("Fetching {} prices...", category));
    let snapshot = service
        .refresh_prices(category, &|| pb.inc(1))
        .await
        .ok_or_else(|| anyhow!("Price batch for {category} was superseded"))?;
    pb.finish_and_clear();

    let output = match format {
        OutputFormat::Table => render_table(category, &assets, &snapshot),
        OutputFormat::Json => render_json(category, &snapshot)?,
    };
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SourcesConfig;
    use crate::core::refresh::RefreshSlot;
    use crate::core::registry::AssetRegistry;
    use crate::core::{FailureReason, Quote};

    async fn snapshot(entries: &[(&str, Quote)]) -> Snapshot<PriceMapping> {
        let slot = RefreshSlot::new();
        let token = slot.begin();
        let prices: PriceMapping = entries
            .iter()
            .map(|(k, q)| (k.to_string(), q.clone()))
            .collect();
        slot.commit(token, prices).await.unwrap()
    }

    #[tokio::test]
    async fn test_render_table() {
        let registry = AssetRegistry::new(&SourcesConfig::default()).unwrap();
        let assets = registry.by_category(AssetCategory::Currency);
        let snapshot = snapshot(&[
            ("usd", Quote::Price(58200.0)),
            ("eur", Quote::Failed(FailureReason::Timeout)),
            ("usd_tgju", Quote::Price(58350.0)),
        ])
        .await;

        let output = render_table(AssetCategory::Currency, &assets, &snapshot);
        assert!(output.contains("Currencies"));
        assert!(output.contains("58,200"));
        assert!(output.contains("error (timeout)"));
        assert!(output.contains("cross-check of usd"));
        assert!(output.contains("N/A"), "keys missing from the snapshot render as N/A");
        assert!(!output.contains("No prices could be fetched."));
    }

    #[tokio::test]
    async fn test_render_table_all_failed() {
        let registry = AssetRegistry::new(&SourcesConfig::default()).unwrap();
        let assets = registry.by_category(AssetCategory::Coin);
        let snapshot = snapshot(&[("emami", Quote::Failed(FailureReason::NoMatch))]).await;

        let output = render_table(AssetCategory::Coin, &assets, &snapshot);
        assert!(output.contains("No prices could be fetched."));
    }

    #[tokio::test]
    async fn test_render_json() {
        let snapshot = snapshot(&[
            ("geram18", Quote::Price(6_512_300.0)),
            ("mithqal", Quote::Failed(FailureReason::HttpStatus(502))),
        ])
        .await;

        let json: serde_json::Value =
            serde_json::from_str(&render_json(AssetCategory::Gold, &snapshot).unwrap()).unwrap();
        assert_eq!(json["category"], "gold");
        assert_eq!(json["batch"], 1);
        assert_eq!(json["prices"]["geram18"], 6_512_300.0);
        assert_eq!(json["prices"]["mithqal"]["reason"], "http_status");
    }
}
