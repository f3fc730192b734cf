//! Synthetic depth for the order-book panel.
//!
//! There is no matching engine behind the client; each side of a
//! selection gets a fixed three-tier ladder derived from its base price.
//! Deeper tiers on the selected side pay a better multiplier in exchange
//! for committing against more synthetic liquidity; the opposite column
//! mirrors the drift downward.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::odds::{AmericanOdds, OddsError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tiers per side.
pub const TIERS: usize = 3;

/// Multiplier drift per tier.
const TIER_STEP: f64 = 0.02;

/// Placeholder liquidity schedules. Cumulative sums gate which tier a
/// wager can fill at.
const SELECTED_LIQUIDITY: [f64; TIERS] = [37.51, 1218.18, 5420.00];
const OPPOSITE_LIQUIDITY: [f64; TIERS] = [125.00, 890.50, 3200.00];

// ---------------------------------------------------------------------------
// Ladder
// ---------------------------------------------------------------------------

/// Which column of the book a ladder renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    Selected,
    Opposite,
}

/// One tier of the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    price: AmericanOdds,
    multiplier: f64,
    liquidity: f64,
    cumulative: f64,
}

impl BookLevel {
    /// American rendering of this tier's price.
    pub const fn price(&self) -> AmericanOdds {
        self.price
    }

    /// Raw decimal multiplier, used by the payout preview.
    pub const fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Synthetic liquidity offered at this tier alone.
    pub const fn liquidity(&self) -> f64 {
        self.liquidity
    }

    /// Liquidity available through this tier (running sum).
    pub const fn cumulative(&self) -> f64 {
        self.cumulative
    }
}

impl fmt::Display for BookLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.4}x) liq=${:.2} cum=${:.2}",
            self.price, self.multiplier, self.liquidity, self.cumulative,
        )
    }
}

/// Build the three-tier ladder for one side of a selection.
///
/// Tier 0 carries the base price unmodified. Only an extreme favorite on
/// the opposite side can drift a multiplier out of domain, which fails
/// loudly rather than rendering a price that does not exist.
pub fn ladder(base: AmericanOdds, side: BookSide) -> Result<Vec<BookLevel>, OddsError> {
    let base_decimal = base.decimal();
    let schedule = match side {
        BookSide::Selected => &SELECTED_LIQUIDITY,
        BookSide::Opposite => &OPPOSITE_LIQUIDITY,
    };

    let mut levels = Vec::with_capacity(TIERS);
    let mut cumulative = 0.0;
    for (tier, &liquidity) in schedule.iter().enumerate() {
        let drift = TIER_STEP * tier as f64;
        let multiplier = match side {
            BookSide::Selected => base_decimal * (1.0 + drift),
            BookSide::Opposite => base_decimal * (1.0 - drift),
        };
        cumulative += liquidity;
        levels.push(BookLevel {
            price: AmericanOdds::from_decimal(multiplier)?,
            multiplier,
            liquidity,
            cumulative,
        });
    }
    Ok(levels)
}

// ---------------------------------------------------------------------------
// Tier selection
// ---------------------------------------------------------------------------

/// First tier whose cumulative liquidity covers the wager, saturating to
/// the deepest tier. A zero wager sits at tier 0.
pub fn effective_tier(levels: &[BookLevel], wager: f64) -> usize {
    levels
        .iter()
        .position(|level| level.cumulative >= wager)
        .unwrap_or(levels.len().saturating_sub(1))
}

/// Apply a tap on a tier. Picks whose cumulative liquidity cannot cover
/// the current wager re-snap to the effective tier; everything else is
/// honored. Out-of-range picks clamp to the deepest tier.
pub fn snap_tier(levels: &[BookLevel], picked: usize, wager: f64) -> usize {
    let picked = picked.min(levels.len().saturating_sub(1));
    if wager > 0.0 && levels[picked].cumulative < wager {
        effective_tier(levels, wager)
    } else {
        picked
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
