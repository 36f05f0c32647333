use super::{OutputFormat, ui};
use crate::core::rates::convert;
use crate::core::refresh::Snapshot;
use crate::core::{Asset, PriceService, RateMapping};
use anyhow::{Result, anyhow, bail};
use comfy_table::Cell;
use std::collections::BTreeMap;

pub fn render_table(assets: &[&Asset], base: &str, snapshot: &Snapshot<RateMapping>) -> String {
    let base_code = base.to_uppercase();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Key"),
        ui::header_cell(&format!("Rate ({base_code})")),
    ]);

    for asset in assets {
        let rate = snapshot.data.get(&asset.key).copied().flatten();
        table.add_row(vec![
            Cell::new(&asset.title),
            Cell::new(&asset.key),
            ui::format_optional_cell(rate, |r| format!("{r:.4}")),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text(
            &format!("Rates against {base_code}"),
            ui::StyleType::Title
        )
    );
    output.push_str(&table.to_string());

    if snapshot.data.values().all(Option::is_none) {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("Rates unavailable: the {base_code} price could not be fetched."),
                ui::StyleType::Error
            )
        ));
    }
    output
}

pub fn render_json(base: &str, snapshot: &Snapshot<RateMapping>) -> Result<String> {
    let rates: BTreeMap<_, _> = snapshot.data.iter().collect();
    let value = serde_json::json!({
        "base": base,
        "batch": snapshot.batch.id(),
        "fetched_at": snapshot.fetched_at,
        "rates": rates,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

async fn fetch_rates(service: &PriceService) -> Result<Snapshot<RateMapping>> {
    let pb = ui::new_progress_bar(service.registry().rate_currencies().len() as u64, true);
    pb.set_message("Fetching rates...");
    let snapshot = service
        .refresh_rates(&|| pb.inc(1))
        .await
        .ok_or_else(|| anyhow!("Rate batch was superseded"))?;
    pb.finish_and_clear();
    Ok(snapshot)
}

pub async fn run(service: &PriceService, format: OutputFormat) -> Result<()> {
    let snapshot = fetch_rates(service).await?;
    let base = service.base_currency();

    let output = match format {
        OutputFormat::Table => {
            render_table(&service.registry().rate_currencies(), base, &snapshot)
        }
        OutputFormat::Json => render_json(base, &snapshot)?,
    };
    println!("{output}");
    Ok(())
}

pub async fn run_convert(
    service: &PriceService,
    amount: f64,
    from: &str,
    to: &str,
    format: OutputFormat,
) -> Result<()> {
    let from = from.to_lowercase();
    let to = to.to_lowercase();
    let known = service.registry().rate_currencies();
    for code in [&from, &to] {
        if !known.iter().any(|a| &a.key == code) {
            bail!("Unknown currency: {}", code);
        }
    }

    let snapshot = fetch_rates(service).await?;
    let result = convert(&snapshot.data, amount, &from, &to)
        .ok_or_else(|| anyhow!("Rates unavailable for {} -> {}", from, to))?;

    match format {
        OutputFormat::Table => println!(
            "{} {} = {} {}",
            ui::format_amount(amount),
            from.to_uppercase(),
            ui::style_text(&ui::format_amount(result), ui::StyleType::Title),
            to.to_uppercase()
        ),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "amount": amount,
                "from": from,
                "to": to,
                "result": result,
            }))?
        ),
    }
    Ok(())
}
