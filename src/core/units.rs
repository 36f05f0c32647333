//! Fixed-ratio conversions between source and display subunits

use super::quote::Quote;

/// Rials in one toman.
pub const RIAL_PER_TOMAN: f64 = 10.0;

/// Conversion applied to an extracted price before it is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitConversion {
    /// Source already quotes in the display unit.
    #[default]
    None,
    /// Source quotes in rial, display is toman.
    RialToToman,
}

impl UnitConversion {
    pub fn apply(self, quote: Quote) -> Quote {
        match self {
            UnitConversion::None => quote,
            UnitConversion::RialToToman => to_display_unit(quote),
        }
    }
}

/// Converts a rial quote to toman. Failures pass through untouched.
pub fn to_display_unit(quote: Quote) -> Quote {
    match quote {
        Quote::Price(rial) => Quote::Price(rial / RIAL_PER_TOMAN),
        failed => failed,
    }
}
