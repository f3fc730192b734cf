//! Book-with-margin comparison.
//!
//! Shows what a traditional sportsbook's vigged price would look like
//! next to the fair price. Strictly display-side: nothing here feeds
//! back into tier pricing, payout previews, or the ledgers.

use super::{AmericanOdds, OddsError};

/// Haircut applied to fair decimals above even money. Longshots carry
/// more juice at a traditional book.
const LONGSHOT_MARGIN: f64 = 0.91;

/// Haircut applied at or below even money.
const FAVORITE_MARGIN: f64 = 0.95;

/// Books named on synthesized comparison rows when a leg carries no
/// real quotes. Placeholder prices, same margin for each.
pub(crate) const SYNTHETIC_BOOKS: &[(&str, &str)] = &[
    ("draftkings", "DraftKings"),
    ("fanduel", "FanDuel"),
    ("betmgm", "BetMGM"),
];

/// The margin-adjusted price a traditional book would show for a fair
/// (no-vig) price.
///
/// Fails only when the haircut pushes an extreme favorite's multiplier
/// to 1.0 or below, where no American rendering exists.
pub fn with_margin(fair: AmericanOdds) -> Result<AmericanOdds, OddsError> {
    let decimal = fair.decimal();
    let margin = if decimal > 2.0 {
        LONGSHOT_MARGIN
    } else {
        FAVORITE_MARGIN
    };
    AmericanOdds::from_decimal(decimal * margin)
}

/// Percentage saved betting `fair` instead of `book`, in payout terms.
pub fn savings_pct(fair: AmericanOdds, book: AmericanOdds) -> f64 {
    let fair_decimal = fair.decimal();
    let book_decimal = book.decimal();
    (fair_decimal - book_decimal) / book_decimal * 100.0
}

/// Savings against this module's own synthetic margin price.
pub fn margin_savings_pct(fair: AmericanOdds) -> Result<f64, OddsError> {
    Ok(savings_pct(fair, with_margin(fair)?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
