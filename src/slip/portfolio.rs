//! Placed-bet history.
//!
//! An in-memory store ordered most-recent-first. Settlement routes
//! through [`PlacedBet::settle`], so the first terminal outcome sticks
//! and repeat settlements are no-ops.

use serde::{Deserialize, Serialize};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::types::{BetStatus, Currency, PlacedBet};

/// Most-recent-first collection of placed bets.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    bets: Vec<PlacedBet>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a freshly placed bet. Newest stays at index 0.
    pub fn record(&mut self, bet: PlacedBet) {
        self.bets.insert(0, bet);
    }

    /// Settle a bet by id. Returns true only when this call performed
    /// the transition; unknown ids and already-settled bets are no-ops.
    pub fn settle(&mut self, bet_id: &str, won: bool) -> bool {
        match self.bets.iter_mut().find(|bet| bet.id == bet_id) {
            Some(bet) => bet.settle(won),
            None => false,
        }
    }

    pub fn get(&self, bet_id: &str) -> Option<&PlacedBet> {
        self.bets.iter().find(|bet| bet.id == bet_id)
    }

    /// All bets, newest first.
    pub fn all(&self) -> &[PlacedBet] {
        &self.bets
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    /// Bets still awaiting an outcome.
    pub fn active(&self) -> Vec<&PlacedBet> {
        self.bets
            .iter()
            .filter(|bet| !bet.status.is_terminal())
            .collect()
    }

    /// Bets with a terminal outcome.
    pub fn settled(&self) -> Vec<&PlacedBet> {
        self.bets
            .iter()
            .filter(|bet| bet.status.is_terminal())
            .collect()
    }

    pub fn by_currency(&self, currency: Currency) -> Vec<&PlacedBet> {
        self.bets
            .iter()
            .filter(|bet| bet.currency == currency)
            .collect()
    }

    /// Bets with at least one commenced leg as of `now`.
    pub fn live(&self, now: DateTime<Utc>) -> Vec<&PlacedBet> {
        self.bets.iter().filter(|bet| bet.is_live(now)).collect()
    }

    /// Bets whose every leg is still pregame as of `now`.
    pub fn pregame(&self, now: DateTime<Utc>) -> Vec<&PlacedBet> {
        self.bets.iter().filter(|bet| !bet.is_live(now)).collect()
    }

    /// Aggregate counts and totals for the portfolio header.
    pub fn summary(&self) -> PortfolioSummary {
        let mut summary = PortfolioSummary::default();
        for bet in &self.bets {
            summary.total += 1;
            match bet.status {
                BetStatus::Active => summary.active += 1,
                BetStatus::Won => summary.won += 1,
                BetStatus::Lost => summary.lost += 1,
            }
            summary.total_wagered += bet.wager;
            summary.total_realized += bet.result.unwrap_or(0.0);
        }
        summary
    }
}

/// Header numbers for the portfolio view.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total: usize,
    pub active: usize,
    pub won: usize,
    pub lost: usize,
    pub total_wagered: f64,
    pub total_realized: f64,
}

impl fmt::Display for PortfolioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bet(s) ({} active, W{}/L{}) | wagered ${:.2} | realized ${:.2}",
            self.total, self.active, self.won, self.lost, self.total_wagered, self.total_realized,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::AmericanOdds;
    use crate::types::BetLeg;

    fn make_placed(id: &str, currency: Currency) -> PlacedBet {
        PlacedBet {
            id: id.to_string(),
            legs: vec![BetLeg::sample()],
            wager: 25.0,
            price: AmericanOdds::new(-110).unwrap(),
            potential_payout: 47.73,
            placed_at: Utc::now(),
            status: BetStatus::Active,
            result: None,
            currency,
        }
    }

    // -- Ordering tests --

    #[test]
    fn test_record_prepends_newest_first() {
        let mut portfolio = Portfolio::new();
        portfolio.record(make_placed("first", Currency::Usd));
        portfolio.record(make_placed("second", Currency::Usd));
        assert_eq!(portfolio.all()[0].id, "second");
        assert_eq!(portfolio.all()[1].id, "first");
    }

    // -- Settlement tests --

    #[test]
    fn test_settle_marks_won_with_payout() {
        let mut portfolio = Portfolio::new();
        portfolio.record(make_placed("bet-1", Currency::Usd));
        assert!(portfolio.settle("bet-1", true));
        let bet = portfolio.get("bet-1").unwrap();
        assert_eq!(bet.status, BetStatus::Won);
        assert_eq!(bet.result, Some(47.73));
    }

    #[test]
    fn test_settle_marks_lost_with_zero() {
        let mut portfolio = Portfolio::new();
        portfolio.record(make_placed("bet-1", Currency::Usd));
        assert!(portfolio.settle("bet-1", false));
        let bet = portfolio.get("bet-1").unwrap();
        assert_eq!(bet.status, BetStatus::Lost);
        assert_eq!(bet.result, Some(0.0));
    }

    #[test]
    fn test_settle_twice_keeps_first_outcome() {
        let mut portfolio = Portfolio::new();
        portfolio.record(make_placed("bet-1", Currency::Usd));
        assert!(portfolio.settle("bet-1", true));
        assert!(!portfolio.settle("bet-1", false));
        let bet = portfolio.get("bet-1").unwrap();
        assert_eq!(bet.status, BetStatus::Won);
        assert_eq!(bet.result, Some(47.73));
    }

    #[test]
    fn test_settle_unknown_id_is_noop() {
        let mut portfolio = Portfolio::new();
        portfolio.record(make_placed("bet-1", Currency::Usd));
        assert!(!portfolio.settle("nope", true));
        assert_eq!(portfolio.get("bet-1").unwrap().status, BetStatus::Active);
    }

    // -- Filter tests --

    #[test]
    fn test_active_and_settled_partition() {
        let mut portfolio = Portfolio::new();
        portfolio.record(make_placed("a", Currency::Usd));
        portfolio.record(make_placed("b", Currency::Usd));
        portfolio.settle("a", false);
        assert_eq!(portfolio.active().len(), 1);
        assert_eq!(portfolio.active()[0].id, "b");
        assert_eq!(portfolio.settled().len(), 1);
        assert_eq!(portfolio.settled()[0].id, "a");
    }

    #[test]
    fn test_by_currency_partition() {
        let mut portfolio = Portfolio::new();
        portfolio.record(make_placed("usd-bet", Currency::Usd));
        portfolio.record(make_placed("btc-bet", Currency::Btc));
        assert_eq!(portfolio.by_currency(Currency::Usd).len(), 1);
        assert_eq!(portfolio.by_currency(Currency::Usd)[0].id, "usd-bet");
        assert_eq!(portfolio.by_currency(Currency::Btc)[0].id, "btc-bet");
    }

    #[test]
    fn test_live_and_pregame_partition() {
        let now = Utc::now();
        let mut portfolio = Portfolio::new();

        let mut live_bet = make_placed("live", Currency::Usd);
        live_bet.legs[0].commence_time = Some(now - chrono::Duration::minutes(30));
        portfolio.record(live_bet);

        let mut pregame_bet = make_placed("pregame", Currency::Usd);
        pregame_bet.legs[0].commence_time = Some(now + chrono::Duration::hours(2));
        portfolio.record(pregame_bet);

        assert_eq!(portfolio.live(now).len(), 1);
        assert_eq!(portfolio.live(now)[0].id, "live");
        assert_eq!(portfolio.pregame(now).len(), 1);
        assert_eq!(portfolio.pregame(now)[0].id, "pregame");
    }

    // -- Summary tests --

    #[test]
    fn test_summary_counts_and_totals() {
        let mut portfolio = Portfolio::new();
        portfolio.record(make_placed("a", Currency::Usd));
        portfolio.record(make_placed("b", Currency::Usd));
        portfolio.record(make_placed("c", Currency::Btc));
        portfolio.settle("a", true);
        portfolio.settle("b", false);

        let summary = portfolio.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.active, 1);
        assert_eq!(summary.won, 1);
        assert_eq!(summary.lost, 1);
        assert!((summary.total_wagered - 75.0).abs() < 1e-9);
        assert!((summary.total_realized - 47.73).abs() < 1e-9);
    }

    #[test]
    fn test_summary_display() {
        let mut portfolio = Portfolio::new();
        portfolio.record(make_placed("a", Currency::Usd));
        let display = format!("{}", portfolio.summary());
        assert!(display.contains("1 bet(s)"));
        assert!(display.contains("1 active"));
    }
}
