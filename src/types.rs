//! Shared types for the oddslip engine.
//!
//! These types form the data model used across the odds, book, slip,
//! and feed modules. They are designed to be stable so that the pricing
//! and state-machine modules can depend on them without circular
//! references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::odds::AmericanOdds;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Market a leg is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    Spread,
    Total,
    Moneyline,
}

impl MarketKind {
    /// All known market kinds (useful for iteration).
    pub const ALL: &'static [MarketKind] =
        &[MarketKind::Spread, MarketKind::Total, MarketKind::Moneyline];

    /// Human-readable label for slips and receipts.
    pub fn label(&self) -> &'static str {
        match self {
            MarketKind::Spread => "Spread",
            MarketKind::Total => "Total",
            MarketKind::Moneyline => "Moneyline",
        }
    }
}

/// Lowercase wire name; also the segment used in leg ids.
impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketKind::Spread => write!(f, "spread"),
            MarketKind::Total => write!(f, "total"),
            MarketKind::Moneyline => write!(f, "moneyline"),
        }
    }
}

/// Parse a market kind, accepting the upstream feed's market keys
/// ("spreads", "totals", "h2h") as aliases.
impl std::str::FromStr for MarketKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spread" | "spreads" => Ok(MarketKind::Spread),
            "total" | "totals" => Ok(MarketKind::Total),
            "moneyline" | "h2h" => Ok(MarketKind::Moneyline),
            _ => Err(anyhow::anyhow!("Unknown market kind: {s}")),
        }
    }
}

/// Side of a market a bettor can take. Spreads and moneylines use
/// `Home`/`Away`; totals use `Over`/`Under`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickSide {
    Home,
    Away,
    Over,
    Under,
}

impl PickSide {
    /// The side the counterparty holds.
    pub fn opposite(&self) -> PickSide {
        match self {
            PickSide::Home => PickSide::Away,
            PickSide::Away => PickSide::Home,
            PickSide::Over => PickSide::Under,
            PickSide::Under => PickSide::Over,
        }
    }
}

impl fmt::Display for PickSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickSide::Home => write!(f, "home"),
            PickSide::Away => write!(f, "away"),
            PickSide::Over => write!(f, "over"),
            PickSide::Under => write!(f, "under"),
        }
    }
}

/// Ledger a wager is funded from. Two fixed ledgers, no conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Btc,
}

impl Currency {
    /// Display symbol for balances and payouts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Btc => "₿",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Btc => write!(f, "BTC"),
        }
    }
}

/// Lifecycle of a placed bet. `Active` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Active,
    Won,
    Lost,
}

impl BetStatus {
    /// Whether the bet has reached a final outcome.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BetStatus::Active)
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetStatus::Active => write!(f, "active"),
            BetStatus::Won => write!(f, "won"),
            BetStatus::Lost => write!(f, "lost"),
        }
    }
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

/// One bookmaker's price for a leg, shown in the comparison panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceQuote {
    /// Bookmaker key: "draftkings" | "fanduel" | "betmgm" | ...
    pub key: String,
    pub title: String,
    pub price: AmericanOdds,
}

impl fmt::Display for SourceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.price)
    }
}

// ---------------------------------------------------------------------------
// Bet leg
// ---------------------------------------------------------------------------

/// A single selection on the slip: one side of one market of one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetLeg {
    /// Derived id: `{game_id}-{selection}-{market}` (see [`BetLeg::derive_id`]).
    pub id: String,
    pub game_id: String,
    /// Team name for spreads and moneylines, "Over"/"Under" for totals.
    pub selection: String,
    pub market: MarketKind,
    /// Rendered point: "-3.5" for a spread, "O 220.5" for a total.
    /// Moneylines carry no point.
    pub point: Option<String>,
    pub price: AmericanOdds,
    pub league: Option<String>,
    /// Scheduled start; drives the live flag on placed bets.
    pub commence_time: Option<DateTime<Utc>>,
    pub opponent: Option<String>,
    /// The other side's point and price, used to render the far column
    /// of the order book.
    pub opposite_point: Option<String>,
    pub opposite_price: Option<AmericanOdds>,
    /// Real per-bookmaker prices when the feed supplied them; empty
    /// means the comparison panel synthesizes margin rows instead.
    #[serde(default)]
    pub source_quotes: Vec<SourceQuote>,
}

impl BetLeg {
    /// Canonical leg id. Two taps on the same side of the same market
    /// must collide here so the slip can toggle.
    pub fn derive_id(game_id: &str, selection: &str, market: MarketKind) -> String {
        format!("{game_id}-{selection}-{market}")
    }

    /// Rows for the price-comparison panel: our fair price first, then
    /// the feed's real bookmaker quotes when present, else synthesized
    /// margin prices for the usual books.
    pub fn comparison_quotes(&self) -> Result<Vec<SourceQuote>, crate::odds::OddsError> {
        let mut rows = vec![SourceQuote {
            key: "oddslip".to_string(),
            title: "Oddslip".to_string(),
            price: self.price,
        }];
        if self.source_quotes.is_empty() {
            let vigged = crate::odds::vig::with_margin(self.price)?;
            for (key, title) in crate::odds::vig::SYNTHETIC_BOOKS {
                rows.push(SourceQuote {
                    key: key.to_string(),
                    title: title.to_string(),
                    price: vigged,
                });
            }
        } else {
            rows.extend(self.source_quotes.iter().cloned());
        }
        Ok(rows)
    }

    /// Helper to build a test leg with sensible defaults.
    #[cfg(test)]
    pub fn sample() -> Self {
        BetLeg {
            id: BetLeg::derive_id("game-001", "Lakers", MarketKind::Spread),
            game_id: "game-001".to_string(),
            selection: "Lakers".to_string(),
            market: MarketKind::Spread,
            point: Some("-3.5".to_string()),
            price: AmericanOdds::new(-110).unwrap(),
            league: Some("NBA".to_string()),
            commence_time: Some(Utc::now() + chrono::Duration::hours(3)),
            opponent: Some("Celtics".to_string()),
            opposite_point: Some("+3.5".to_string()),
            opposite_price: Some(AmericanOdds::new(-110).unwrap()),
            source_quotes: Vec::new(),
        }
    }
}

impl fmt::Display for BetLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.point {
            Some(point) => write!(
                f,
                "{} {} ({}) @ {}",
                self.selection,
                point,
                self.market.label(),
                self.price,
            ),
            None => write!(
                f,
                "{} ({}) @ {}",
                self.selection,
                self.market.label(),
                self.price,
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Placed bet
// ---------------------------------------------------------------------------

/// Immutable snapshot created when a slip is placed. Settlement is the
/// only mutation it ever sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedBet {
    pub id: String,
    pub legs: Vec<BetLeg>,
    pub wager: f64,
    /// Effective American price shown at placement.
    pub price: AmericanOdds,
    pub potential_payout: f64,
    pub placed_at: DateTime<Utc>,
    pub status: BetStatus,
    /// Realized amount once settled: the payout if won, 0 if lost.
    pub result: Option<f64>,
    pub currency: Currency,
}

impl PlacedBet {
    /// Whether this snapshot combines more than one leg.
    pub fn is_parlay(&self) -> bool {
        self.legs.len() > 1
    }

    /// A bet is live once any of its legs has commenced.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.legs
            .iter()
            .any(|leg| leg.commence_time.map_or(false, |t| t <= now))
    }

    /// Apply a settlement outcome. The first terminal transition wins:
    /// returns false and leaves the bet untouched when it is already
    /// settled.
    pub fn settle(&mut self, won: bool) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = if won { BetStatus::Won } else { BetStatus::Lost };
        self.result = Some(if won { self.potential_payout } else { 0.0 });
        true
    }
}

impl fmt::Display for PlacedBet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} leg(s) {}{:.2} @ {} pays {}{:.2} | {}",
            self.currency,
            self.legs.len(),
            self.currency.symbol(),
            self.wager,
            self.price,
            self.currency.symbol(),
            self.potential_payout,
            self.status,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Refused slip mutations. Conversion failures bubble up from the odds
/// module unchanged.
#[derive(Debug, thiserror::Error)]
pub enum SlipError {
    #[error("Cannot place an empty bet slip")]
    EmptySlip,

    #[error("Wager must be positive, got {0:.2}")]
    NonPositiveWager(f64),

    #[error(transparent)]
    Odds(#[from] crate::odds::OddsError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- MarketKind tests --

    #[test]
    fn test_market_kind_display() {
        assert_eq!(format!("{}", MarketKind::Spread), "spread");
        assert_eq!(format!("{}", MarketKind::Total), "total");
        assert_eq!(format!("{}", MarketKind::Moneyline), "moneyline");
    }

    #[test]
    fn test_market_kind_label() {
        assert_eq!(MarketKind::Spread.label(), "Spread");
        assert_eq!(MarketKind::Moneyline.label(), "Moneyline");
    }

    #[test]
    fn test_market_kind_from_str() {
        assert_eq!("spread".parse::<MarketKind>().unwrap(), MarketKind::Spread);
        assert_eq!("spreads".parse::<MarketKind>().unwrap(), MarketKind::Spread);
        assert_eq!("TOTALS".parse::<MarketKind>().unwrap(), MarketKind::Total);
        assert_eq!("h2h".parse::<MarketKind>().unwrap(), MarketKind::Moneyline);
        assert!("futures".parse::<MarketKind>().is_err());
    }

    #[test]
    fn test_market_kind_serialization_roundtrip() {
        for kind in MarketKind::ALL {
            let json = serde_json::to_string(kind).unwrap();
            let parsed: MarketKind = serde_json::from_str(&json).unwrap();
            assert_eq!(*kind, parsed);
        }
        assert_eq!(serde_json::to_string(&MarketKind::Moneyline).unwrap(), "\"moneyline\"");
    }

    // -- PickSide tests --

    #[test]
    fn test_pick_side_opposite() {
        assert_eq!(PickSide::Home.opposite(), PickSide::Away);
        assert_eq!(PickSide::Away.opposite(), PickSide::Home);
        assert_eq!(PickSide::Over.opposite(), PickSide::Under);
        assert_eq!(PickSide::Under.opposite(), PickSide::Over);
    }

    #[test]
    fn test_pick_side_display() {
        assert_eq!(format!("{}", PickSide::Home), "home");
        assert_eq!(format!("{}", PickSide::Under), "under");
    }

    // -- Currency tests --

    #[test]
    fn test_currency_display_and_symbol() {
        assert_eq!(format!("{}", Currency::Usd), "USD");
        assert_eq!(format!("{}", Currency::Btc), "BTC");
        assert_eq!(Currency::Usd.symbol(), "$");
        assert_eq!(Currency::Btc.symbol(), "₿");
    }

    #[test]
    fn test_currency_serialization() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"usd\"");
        let parsed: Currency = serde_json::from_str("\"btc\"").unwrap();
        assert_eq!(parsed, Currency::Btc);
    }

    // -- BetStatus tests --

    #[test]
    fn test_bet_status_terminal() {
        assert!(!BetStatus::Active.is_terminal());
        assert!(BetStatus::Won.is_terminal());
        assert!(BetStatus::Lost.is_terminal());
    }

    #[test]
    fn test_bet_status_serialization() {
        assert_eq!(serde_json::to_string(&BetStatus::Active).unwrap(), "\"active\"");
        let parsed: BetStatus = serde_json::from_str("\"won\"").unwrap();
        assert_eq!(parsed, BetStatus::Won);
    }

    // -- BetLeg tests --

    #[test]
    fn test_leg_derive_id() {
        let id = BetLeg::derive_id("abc123", "Lakers", MarketKind::Spread);
        assert_eq!(id, "abc123-Lakers-spread");
    }

    #[test]
    fn test_leg_derive_id_distinguishes_markets() {
        let spread = BetLeg::derive_id("abc123", "Lakers", MarketKind::Spread);
        let moneyline = BetLeg::derive_id("abc123", "Lakers", MarketKind::Moneyline);
        assert_ne!(spread, moneyline);
    }

    #[test]
    fn test_leg_display_with_point() {
        let leg = BetLeg::sample();
        assert_eq!(format!("{leg}"), "Lakers -3.5 (Spread) @ -110");
    }

    #[test]
    fn test_leg_display_without_point() {
        let mut leg = BetLeg::sample();
        leg.market = MarketKind::Moneyline;
        leg.point = None;
        leg.price = AmericanOdds::new(150).unwrap();
        assert_eq!(format!("{leg}"), "Lakers (Moneyline) @ +150");
    }

    #[test]
    fn test_leg_comparison_quotes_synthesized() {
        let leg = BetLeg::sample(); // -110, no real quotes
        let rows = leg.comparison_quotes().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].key, "oddslip");
        assert_eq!(rows[0].price, leg.price);
        // Placeholder books all show the same margin price.
        let vigged = crate::odds::vig::with_margin(leg.price).unwrap();
        for row in &rows[1..] {
            assert_eq!(row.price, vigged);
        }
    }

    #[test]
    fn test_leg_comparison_quotes_prefers_real_quotes() {
        let mut leg = BetLeg::sample();
        leg.source_quotes = vec![SourceQuote {
            key: "draftkings".to_string(),
            title: "DraftKings".to_string(),
            price: AmericanOdds::new(-118).unwrap(),
        }];
        let rows = leg.comparison_quotes().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].key, "draftkings");
        assert_eq!(rows[1].price, AmericanOdds::new(-118).unwrap());
    }

    #[test]
    fn test_leg_serialization_roundtrip() {
        let leg = BetLeg::sample();
        let json = serde_json::to_string(&leg).unwrap();
        let parsed: BetLeg = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, leg.id);
        assert_eq!(parsed.market, MarketKind::Spread);
        assert_eq!(parsed.price, leg.price);
        assert!(parsed.source_quotes.is_empty());
    }

    // -- PlacedBet tests --

    fn make_placed(status: BetStatus) -> PlacedBet {
        PlacedBet {
            id: "placed-test".to_string(),
            legs: vec![BetLeg::sample()],
            wager: 25.0,
            price: AmericanOdds::new(-110).unwrap(),
            potential_payout: 47.73,
            placed_at: Utc::now(),
            status,
            result: None,
            currency: Currency::Usd,
        }
    }

    #[test]
    fn test_placed_bet_is_parlay() {
        let mut bet = make_placed(BetStatus::Active);
        assert!(!bet.is_parlay());
        bet.legs.push(BetLeg::sample());
        assert!(bet.is_parlay());
    }

    #[test]
    fn test_placed_bet_live_after_commence() {
        let mut bet = make_placed(BetStatus::Active);
        bet.legs[0].commence_time = Some(Utc::now() - chrono::Duration::minutes(10));
        assert!(bet.is_live(Utc::now()));
    }

    #[test]
    fn test_placed_bet_pregame_before_commence() {
        let bet = make_placed(BetStatus::Active); // sample commences in 3h
        assert!(!bet.is_live(Utc::now()));
    }

    #[test]
    fn test_placed_bet_not_live_without_commence_time() {
        let mut bet = make_placed(BetStatus::Active);
        bet.legs[0].commence_time = None;
        assert!(!bet.is_live(Utc::now()));
    }

    #[test]
    fn test_placed_bet_live_if_any_leg_commenced() {
        let mut bet = make_placed(BetStatus::Active);
        let mut second = BetLeg::sample();
        second.commence_time = Some(Utc::now() - chrono::Duration::hours(1));
        bet.legs.push(second);
        assert!(bet.is_live(Utc::now()));
    }

    #[test]
    fn test_settle_win_records_payout() {
        let mut bet = make_placed(BetStatus::Active);
        assert!(bet.settle(true));
        assert_eq!(bet.status, BetStatus::Won);
        assert_eq!(bet.result, Some(47.73));
    }

    #[test]
    fn test_settle_loss_records_zero() {
        let mut bet = make_placed(BetStatus::Active);
        assert!(bet.settle(false));
        assert_eq!(bet.status, BetStatus::Lost);
        assert_eq!(bet.result, Some(0.0));
    }

    #[test]
    fn test_settle_first_terminal_wins() {
        let mut bet = make_placed(BetStatus::Active);
        assert!(bet.settle(true));
        assert!(!bet.settle(false));
        assert_eq!(bet.status, BetStatus::Won);
        assert_eq!(bet.result, Some(47.73));
    }

    #[test]
    fn test_placed_bet_display() {
        let bet = make_placed(BetStatus::Active);
        let display = format!("{bet}");
        assert!(display.contains("USD"));
        assert!(display.contains("$25.00"));
        assert!(display.contains("-110"));
        assert!(display.contains("active"));
    }

    #[test]
    fn test_placed_bet_serialization_roundtrip() {
        let bet = make_placed(BetStatus::Active);
        let json = serde_json::to_string(&bet).unwrap();
        let parsed: PlacedBet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "placed-test");
        assert_eq!(parsed.status, BetStatus::Active);
        assert_eq!(parsed.currency, Currency::Usd);
    }

    // -- SlipError tests --

    #[test]
    fn test_slip_error_display() {
        assert_eq!(
            format!("{}", SlipError::EmptySlip),
            "Cannot place an empty bet slip"
        );
        let e = SlipError::NonPositiveWager(-5.0);
        assert!(format!("{e}").contains("-5.00"));
    }
}
