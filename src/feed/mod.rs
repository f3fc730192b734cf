//! Odds feed integrations.
//!
//! Defines the `OddsFeed` trait and the `GameBoard` model the slip
//! builds legs from. Implementations:
//! - The Odds API — upcoming and in-play odds plus live scores

pub mod the_odds_api;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::odds::AmericanOdds;
use crate::types::{BetLeg, MarketKind, PickSide, SourceQuote};

// ---------------------------------------------------------------------------
// Offered prices
// ---------------------------------------------------------------------------

/// A quoted side of a market: the American price and the point it hangs
/// off (spread handicap or total line; moneylines carry none).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OfferedPrice {
    pub point: Option<f64>,
    pub price: AmericanOdds,
}

/// One bookmaker's prices across a board's markets. Markets the book
/// does not offer stay `None` and the comparison panel skips them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookOffer {
    pub key: String,
    pub title: String,
    pub spread_home: Option<AmericanOdds>,
    pub spread_away: Option<AmericanOdds>,
    pub total_over: Option<AmericanOdds>,
    pub total_under: Option<AmericanOdds>,
    pub moneyline_home: Option<AmericanOdds>,
    pub moneyline_away: Option<AmericanOdds>,
}

impl BookOffer {
    /// This book's quote for a market/side, if offered.
    pub fn quote(&self, market: MarketKind, side: PickSide) -> Option<SourceQuote> {
        let price = match (market, side) {
            (MarketKind::Spread, PickSide::Home) => self.spread_home,
            (MarketKind::Spread, PickSide::Away) => self.spread_away,
            (MarketKind::Total, PickSide::Over) => self.total_over,
            (MarketKind::Total, PickSide::Under) => self.total_under,
            (MarketKind::Moneyline, PickSide::Home) => self.moneyline_home,
            (MarketKind::Moneyline, PickSide::Away) => self.moneyline_away,
            _ => None,
        }?;
        Some(SourceQuote {
            key: self.key.clone(),
            title: self.title.clone(),
            price,
        })
    }
}

// ---------------------------------------------------------------------------
// Game board
// ---------------------------------------------------------------------------

/// Everything the client renders for one game: the matchup, liveness,
/// the six offered prices, and per-bookmaker offers for comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameBoard {
    pub id: String,
    /// League title as the feed reports it, e.g. "NBA".
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: DateTime<Utc>,
    /// Commenced, not completed, and scores are flowing.
    pub is_live: bool,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub spread_home: OfferedPrice,
    pub spread_away: OfferedPrice,
    pub total_over: OfferedPrice,
    pub total_under: OfferedPrice,
    pub moneyline_home: OfferedPrice,
    pub moneyline_away: OfferedPrice,
    #[serde(default)]
    pub book_offers: Vec<BookOffer>,
}

impl GameBoard {
    /// The board's offered price for a market/side. Sides map within the
    /// market's own family: spreads and moneylines take home/away,
    /// totals over/under.
    pub fn offered(&self, market: MarketKind, side: PickSide) -> OfferedPrice {
        match (market, side) {
            (MarketKind::Spread, PickSide::Away) => self.spread_away,
            (MarketKind::Spread, _) => self.spread_home,
            (MarketKind::Total, PickSide::Under) => self.total_under,
            (MarketKind::Total, _) => self.total_over,
            (MarketKind::Moneyline, PickSide::Away) => self.moneyline_away,
            (MarketKind::Moneyline, _) => self.moneyline_home,
        }
    }

    /// Build a slip leg for a market/side, carrying everything the slip
    /// and order book render: the point label, the opposite side's point
    /// and price, and the bookmaker quotes for the comparison panel.
    pub fn leg(&self, market: MarketKind, side: PickSide) -> BetLeg {
        let offer = self.offered(market, side);
        let counter = side.opposite();
        let opposite = self.offered(market, counter);
        let selection = self.selection(side).to_string();
        BetLeg {
            id: BetLeg::derive_id(&self.id, &selection, market),
            game_id: self.id.clone(),
            selection,
            market,
            point: offer.point.map(|point| render_point(market, side, point)),
            price: offer.price,
            league: Some(self.league.clone()),
            commence_time: Some(self.commence_time),
            opponent: self.opponent(side),
            opposite_point: opposite
                .point
                .map(|point| render_point(market, counter, point)),
            opposite_price: Some(opposite.price),
            source_quotes: self
                .book_offers
                .iter()
                .filter_map(|book| book.quote(market, side))
                .collect(),
        }
    }

    fn selection(&self, side: PickSide) -> &str {
        match side {
            PickSide::Home => &self.home_team,
            PickSide::Away => &self.away_team,
            PickSide::Over => "Over",
            PickSide::Under => "Under",
        }
    }

    fn opponent(&self, side: PickSide) -> Option<String> {
        match side {
            PickSide::Home => Some(self.away_team.clone()),
            PickSide::Away => Some(self.home_team.clone()),
            PickSide::Over | PickSide::Under => None,
        }
    }
}

impl fmt::Display for GameBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} ({})", self.away_team, self.home_team, self.league)?;
        if self.is_live {
            match (self.away_score, self.home_score) {
                (Some(away), Some(home)) => write!(f, " LIVE {}-{}", away, home)?,
                _ => write!(f, " LIVE")?,
            }
        }
        Ok(())
    }
}

/// Point label a leg renders: signed handicap for spreads, `O`/`U`
/// prefix for totals.
fn render_point(market: MarketKind, side: PickSide, point: f64) -> String {
    match market {
        MarketKind::Total => {
            let prefix = if side == PickSide::Under { "U" } else { "O" };
            format!("{} {}", prefix, point)
        }
        _ => format!("{:+}", point),
    }
}

// ---------------------------------------------------------------------------
// Feed trait
// ---------------------------------------------------------------------------

/// Abstraction over remote odds sources.
///
/// Implementors fetch the boards for one sport at a time; the caller
/// decides which sports to poll and how to fall back when a feed is
/// unavailable.
#[async_trait]
pub trait OddsFeed: Send + Sync {
    /// Fetch game boards for a sport key (e.g. "basketball_nba").
    async fn fetch_games(&self, sport: &str) -> Result<Vec<GameBoard>>;

    /// Feed name for logging and identification.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Built-in boards
// ---------------------------------------------------------------------------

/// Two built-in boards so the client runs without a feed key: one
/// pregame matchup with bookmaker quotes, one game already in play.
pub fn sample_boards() -> Vec<GameBoard> {
    let juice = AmericanOdds::from_const(-110);
    vec![
        GameBoard {
            id: "sample-bos-lal".to_string(),
            league: "NBA".to_string(),
            home_team: "Los Angeles Lakers".to_string(),
            away_team: "Boston Celtics".to_string(),
            commence_time: Utc::now() + Duration::hours(3),
            is_live: false,
            home_score: None,
            away_score: None,
            spread_home: OfferedPrice { point: Some(-3.5), price: juice },
            spread_away: OfferedPrice { point: Some(3.5), price: juice },
            total_over: OfferedPrice { point: Some(220.5), price: juice },
            total_under: OfferedPrice { point: Some(220.5), price: juice },
            moneyline_home: OfferedPrice {
                point: None,
                price: AmericanOdds::from_const(-150),
            },
            moneyline_away: OfferedPrice {
                point: None,
                price: AmericanOdds::from_const(130),
            },
            book_offers: vec![
                BookOffer {
                    key: "draftkings".to_string(),
                    title: "DraftKings".to_string(),
                    moneyline_home: Some(AmericanOdds::from_const(-152)),
                    moneyline_away: Some(AmericanOdds::from_const(126)),
                    ..Default::default()
                },
                BookOffer {
                    key: "fanduel".to_string(),
                    title: "FanDuel".to_string(),
                    moneyline_home: Some(AmericanOdds::from_const(-148)),
                    moneyline_away: Some(AmericanOdds::from_const(128)),
                    ..Default::default()
                },
            ],
        },
        GameBoard {
            id: "sample-den-gsw".to_string(),
            league: "NBA".to_string(),
            home_team: "Golden State Warriors".to_string(),
            away_team: "Denver Nuggets".to_string(),
            commence_time: Utc::now() - Duration::hours(1),
            is_live: true,
            home_score: Some(61),
            away_score: Some(58),
            spread_home: OfferedPrice { point: Some(-1.5), price: juice },
            spread_away: OfferedPrice { point: Some(1.5), price: juice },
            total_over: OfferedPrice { point: Some(228.5), price: juice },
            total_under: OfferedPrice { point: Some(228.5), price: juice },
            moneyline_home: OfferedPrice {
                point: None,
                price: AmericanOdds::from_const(-125),
            },
            moneyline_away: OfferedPrice {
                point: None,
                price: AmericanOdds::from_const(105),
            },
            book_offers: Vec::new(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
