//! Parlay pricing.
//!
//! A parlay pays only if every leg wins, so its multiplier is the product
//! of the legs' decimal prices. The combined price carries both renderings
//! because the slip shows the American form while the payout preview
//! multiplies by the raw decimal.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AmericanOdds, OddsError};

/// Combined price of a set of legs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedPrice {
    pub american: AmericanOdds,
    pub decimal: f64,
}

impl CombinedPrice {
    /// Price of an empty slip: even money, so the slip always has
    /// something to render.
    pub fn even() -> Self {
        CombinedPrice {
            american: AmericanOdds::EVEN,
            decimal: 2.0,
        }
    }
}

impl fmt::Display for CombinedPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}x)", self.american, self.decimal)
    }
}

/// Combine leg prices into one parlay price.
///
/// Order-independent; a single leg reproduces its own price. The error
/// path is only reachable through absurd inputs (enough longshot legs to
/// overflow f64), which the conversion rejects loudly rather than
/// rendering garbage.
pub fn combine(legs: &[AmericanOdds]) -> Result<CombinedPrice, OddsError> {
    if legs.is_empty() {
        return Ok(CombinedPrice::even());
    }
    let decimal: f64 = legs.iter().map(|leg| leg.decimal()).product();
    Ok(CombinedPrice {
        american: AmericanOdds::from_decimal(decimal)?,
        decimal,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
