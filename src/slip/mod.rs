//! The bet slip state machine.
//!
//! Explicit transitions (toggle, tier pick, place, settle) own all
//! mutation; prices and payouts are derived on read through
//! [`BetSlip::quote`], so there is no cached pricing to fall out of sync
//! with the legs.

pub mod portfolio;
pub mod wallet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::book::{self, BookSide};
use crate::odds::{parlay, AmericanOdds};
use crate::types::{BetLeg, BetStatus, Currency, PlacedBet, SlipError};
use portfolio::Portfolio;
use wallet::Wallet;

// ---------------------------------------------------------------------------
// Confirmation
// ---------------------------------------------------------------------------

/// One-shot signal raised by a successful placement, cleared only by
/// explicit acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    Pick,
    Parlay,
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confirmation::Pick => write!(f, "pick"),
            Confirmation::Parlay => write!(f, "parlay"),
        }
    }
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// Derived pricing for the current slip at a given wager. Consumed by
/// the presentation layer, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlipQuote {
    pub price: AmericanOdds,
    pub multiplier: f64,
    /// `wager * multiplier`.
    pub payout: f64,
    /// Book tier a single-pick price came from; None for parlays and
    /// custom prices.
    pub tier: Option<usize>,
}

impl fmt::Display for SlipQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.4}x) pays {:.2}",
            self.price, self.multiplier, self.payout,
        )
    }
}

// ---------------------------------------------------------------------------
// Slip
// ---------------------------------------------------------------------------

/// Pending selections plus the pricing inputs the bettor has pinned:
/// an explicitly picked book tier, or a custom "make" price. Both reset
/// whenever the leg set changes.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BetSlip {
    legs: Vec<BetLeg>,
    chosen_tier: Option<usize>,
    custom_price: Option<AmericanOdds>,
}

impl BetSlip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the leg, or remove it when a leg with the same id is already
    /// on the slip. Toggling twice restores the prior leg set. Returns
    /// whether the leg is now selected.
    pub fn toggle(&mut self, leg: BetLeg) -> bool {
        self.chosen_tier = None;
        self.custom_price = None;
        if let Some(pos) = self.legs.iter().position(|on_slip| on_slip.id == leg.id) {
            self.legs.remove(pos);
            false
        } else {
            self.legs.push(leg);
            true
        }
    }

    /// Remove a leg by id. Unknown ids are a no-op and leave pinned
    /// pricing inputs untouched.
    pub fn remove(&mut self, leg_id: &str) -> bool {
        let before = self.legs.len();
        self.legs.retain(|leg| leg.id != leg_id);
        let removed = self.legs.len() != before;
        if removed {
            self.chosen_tier = None;
            self.custom_price = None;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.legs.clear();
        self.chosen_tier = None;
        self.custom_price = None;
    }

    pub fn is_selected(&self, leg_id: &str) -> bool {
        self.legs.iter().any(|leg| leg.id == leg_id)
    }

    /// Legs in insertion order.
    pub fn legs(&self) -> &[BetLeg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Tap a tier on the single-pick order book. Picks that cannot cover
    /// the current wager re-snap to the effective tier. Returns the tier
    /// actually stored, or None when the slip is not a single pick.
    pub fn pick_tier(&mut self, tier: usize, wager: f64) -> Result<Option<usize>, SlipError> {
        if self.legs.len() != 1 {
            return Ok(None);
        }
        let levels = book::ladder(self.legs[0].price, BookSide::Selected)?;
        let snapped = book::snap_tier(&levels, tier, wager);
        self.chosen_tier = Some(snapped);
        Ok(Some(snapped))
    }

    /// Pin a custom "make" price. While set it takes precedence over
    /// tier- and parlay-derived pricing.
    pub fn set_custom_price(&mut self, price: AmericanOdds) {
        self.custom_price = Some(price);
    }

    pub fn clear_custom_price(&mut self) {
        self.custom_price = None;
    }

    /// Price the slip at a wager.
    ///
    /// Precedence: a pinned custom price wins outright; a single pick
    /// prices off its book tier (the picked tier while it can cover the
    /// wager, else the wager-derived effective tier); anything else is
    /// the parlay product, with the empty slip defined as even money.
    pub fn quote(&self, wager: f64) -> Result<SlipQuote, SlipError> {
        if let Some(custom) = self.custom_price {
            let multiplier = custom.decimal();
            return Ok(SlipQuote {
                price: custom,
                multiplier,
                payout: wager * multiplier,
                tier: None,
            });
        }

        if self.legs.len() == 1 {
            let levels = book::ladder(self.legs[0].price, BookSide::Selected)?;
            let tier = match self.chosen_tier {
                Some(picked) if wager <= 0.0 || levels[picked].cumulative() >= wager => picked,
                _ => book::effective_tier(&levels, wager),
            };
            let level = &levels[tier];
            return Ok(SlipQuote {
                price: level.price(),
                multiplier: level.multiplier(),
                payout: wager * level.multiplier(),
                tier: Some(tier),
            });
        }

        let prices: Vec<AmericanOdds> = self.legs.iter().map(|leg| leg.price).collect();
        let combined = parlay::combine(&prices)?;
        Ok(SlipQuote {
            price: combined.american,
            multiplier: combined.decimal,
            payout: wager * combined.decimal,
            tier: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The full machine: slip, ledgers, history, and the placement
/// confirmation signal. One instance per session; every operation is
/// synchronous and never blocks on I/O.
#[derive(Debug, Default)]
pub struct SlipEngine {
    slip: BetSlip,
    wallet: Wallet,
    portfolio: Portfolio,
    confirmation: Option<Confirmation>,
}

impl SlipEngine {
    /// Engine over a freshly funded wallet.
    pub fn new(wallet: Wallet) -> Self {
        SlipEngine {
            slip: BetSlip::new(),
            wallet,
            portfolio: Portfolio::new(),
            confirmation: None,
        }
    }

    // -- Slip operations ---------------------------------------------------

    pub fn toggle(&mut self, leg: BetLeg) -> bool {
        let leg_id = leg.id.clone();
        let selected = self.slip.toggle(leg);
        debug!(
            leg_id = %leg_id,
            selected,
            on_slip = self.slip.len(),
            "Leg toggled"
        );
        selected
    }

    pub fn remove(&mut self, leg_id: &str) -> bool {
        let removed = self.slip.remove(leg_id);
        if removed {
            debug!(leg_id = %leg_id, on_slip = self.slip.len(), "Leg removed");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.slip.clear();
        debug!("Slip cleared");
    }

    pub fn is_selected(&self, leg_id: &str) -> bool {
        self.slip.is_selected(leg_id)
    }

    pub fn legs(&self) -> &[BetLeg] {
        self.slip.legs()
    }

    pub fn pick_tier(&mut self, tier: usize, wager: f64) -> Result<Option<usize>, SlipError> {
        let stored = self.slip.pick_tier(tier, wager)?;
        if let Some(snapped) = stored {
            debug!(requested = tier, snapped, wager, "Book tier picked");
        }
        Ok(stored)
    }

    pub fn set_custom_price(&mut self, price: AmericanOdds) {
        debug!(price = %price, "Custom price pinned");
        self.slip.set_custom_price(price);
    }

    pub fn clear_custom_price(&mut self) {
        self.slip.clear_custom_price();
    }

    pub fn quote(&self, wager: f64) -> Result<SlipQuote, SlipError> {
        self.slip.quote(wager)
    }

    // -- Placement -----------------------------------------------------------

    /// Place the current slip at the price and payout the caller is
    /// displaying. Refused with the state untouched when the wager is
    /// not positive or the slip is empty. On success the chosen ledger
    /// is debited (floored at zero), an immutable snapshot lands at the
    /// head of the portfolio, the confirmation signal is raised, and
    /// the slip resets.
    pub fn place(
        &mut self,
        wager: f64,
        price: AmericanOdds,
        payout: f64,
        currency: Currency,
    ) -> Result<PlacedBet, SlipError> {
        if wager.is_nan() || wager <= 0.0 {
            return Err(SlipError::NonPositiveWager(wager));
        }
        if self.slip.is_empty() {
            return Err(SlipError::EmptySlip);
        }

        let balance = self.wallet.debit(currency, wager);
        let bet = PlacedBet {
            id: format!("placed-{}", Uuid::new_v4()),
            legs: self.slip.legs().to_vec(),
            wager,
            price,
            potential_payout: payout,
            placed_at: Utc::now(),
            status: BetStatus::Active,
            result: None,
            currency,
        };

        self.confirmation = Some(if bet.is_parlay() {
            Confirmation::Parlay
        } else {
            Confirmation::Pick
        });
        self.portfolio.record(bet.clone());
        self.slip.clear();

        info!(
            bet_id = %bet.id,
            legs = bet.legs.len(),
            wager = format!("{}{:.2}", currency.symbol(), wager),
            price = %price,
            payout = format!("{}{:.2}", currency.symbol(), payout),
            balance = format!("{:.2}", balance),
            "Bet placed"
        );
        Ok(bet)
    }

    /// The pending confirmation, if one has not been acknowledged yet.
    pub fn confirmation(&self) -> Option<Confirmation> {
        self.confirmation
    }

    /// Acknowledge and clear the confirmation signal.
    pub fn acknowledge(&mut self) -> Option<Confirmation> {
        self.confirmation.take()
    }

    // -- Settlement ----------------------------------------------------------

    /// Settle a placed bet by id. The first terminal outcome sticks;
    /// repeat settlements and unknown ids are no-ops.
    pub fn settle(&mut self, bet_id: &str, won: bool) -> bool {
        let settled = self.portfolio.settle(bet_id, won);
        if settled {
            info!(bet_id = %bet_id, won, "Bet settled");
        } else {
            debug!(bet_id = %bet_id, "Settlement ignored");
        }
        settled
    }

    // -- Views ---------------------------------------------------------------

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
