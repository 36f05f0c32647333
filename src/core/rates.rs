//! Currency rates relative to a base currency

use super::quote::{PriceMapping, RateMapping};
use tracing::{debug, error};

fn usable(price: Option<f64>) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p != 0.0)
}

/// Turns raw currency prices into rates against `base_key`.
///
/// Each rate is the value of one unit of that currency in base units
/// (`price / base_price`), so the base itself is exactly 1.0. If the base
/// price is missing, failed, zero or not finite, every rate is `None`,
/// the base's own slot included. Otherwise only the currencies whose own
/// price failed are `None`.
pub fn normalize(prices: &PriceMapping, base_key: &str) -> RateMapping {
    let base_quote = prices.get(base_key);
    let Some(base_price) = usable(base_quote.and_then(|q| q.price())) else {
        match base_quote {
            None => error!(base = base_key, "Base currency missing; all rates unavailable"),
            Some(quote) => {
                error!(base = base_key, %quote, "Base currency unusable; all rates unavailable")
            }
        }
        return prices.keys().map(|k| (k.clone(), None)).collect();
    };

    let mut rates: RateMapping = prices
        .iter()
        .map(|(key, quote)| {
            let rate = quote
                .price()
                .filter(|p| p.is_finite())
                .map(|p| p / base_price);
            (key.clone(), rate)
        })
        .collect();
    rates.insert(base_key.to_string(), Some(1.0));

    debug!(?rates, base = base_key, "Normalized rates");
    rates
}

/// Converts `amount` of `from` into `to` using rates against a common base.
///
/// Returns `None` when either rate is unavailable or zero.
pub fn convert(rates: &RateMapping, amount: f64, from: &str, to: &str) -> Option<f64> {
    if !amount.is_finite() {
        return None;
    }
    let from_rate = usable(rates.get(from).copied().flatten())?;
    let to_rate = usable(rates.get(to).copied().flatten())?;
    Some(amount * from_rate / to_rate)
}
