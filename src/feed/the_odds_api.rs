//! The Odds API integration.
//!
//! Serves upcoming and in-play boards for one sport per call, merging
//! the odds and scores endpoints into `GameBoard`s.
//!
//! API docs: https://the-odds-api.com/liveapi/guides/v4/
//! Base URL: https://api.the-odds-api.com/v4/
//! Auth: `apiKey` query parameter on every request.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::{BookOffer, GameBoard, OddsFeed, OfferedPrice};
use crate::odds::AmericanOdds;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const BASE_URL: &str = "https://api.the-odds-api.com/v4";
const FEED_NAME: &str = "the-odds-api";

/// Markets requested on every odds call.
const MARKETS: &str = "h2h,spreads,totals";

/// How far back the scores endpoint looks for in-play games (API max 3).
const SCORES_DAYS_FROM: u8 = 1;

// Fallback lines shown when no book has posted a market yet.
const FALLBACK_SPREAD_POINT: f64 = -3.5;
const FALLBACK_TOTAL_POINT: f64 = 220.5;
const FALLBACK_JUICE: AmericanOdds = AmericanOdds::from_const(-110);
const FALLBACK_ML_HOME: AmericanOdds = AmericanOdds::from_const(-150);
const FALLBACK_ML_AWAY: AmericanOdds = AmericanOdds::from_const(130);

// ---------------------------------------------------------------------------
// API response types (The Odds API JSON → Rust)
// ---------------------------------------------------------------------------

/// One event from `/v4/sports/{sport}/odds`. The API speaks snake_case,
/// so field names map directly.
#[derive(Debug, Deserialize)]
struct OddsEvent {
    id: String,
    /// League title, e.g. "NBA".
    #[serde(default)]
    sport_title: String,
    commence_time: DateTime<Utc>,
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<BookmakerDto>,
}

#[derive(Debug, Deserialize)]
struct BookmakerDto {
    key: String,
    title: String,
    #[serde(default)]
    markets: Vec<MarketDto>,
}

#[derive(Debug, Deserialize)]
struct MarketDto {
    /// "h2h", "spreads" or "totals".
    key: String,
    #[serde(default)]
    outcomes: Vec<OutcomeDto>,
}

#[derive(Debug, Deserialize)]
struct OutcomeDto {
    /// Team name, or "Over"/"Under" for totals.
    name: String,
    /// American price (requested via `oddsFormat=american`).
    price: f64,
    #[serde(default)]
    point: Option<f64>,
}

/// One event from `/v4/sports/{sport}/scores`.
#[derive(Debug, Deserialize)]
struct ScoreEvent {
    id: String,
    #[serde(default)]
    completed: bool,
    /// Absent until the game starts.
    #[serde(default)]
    scores: Option<Vec<ScoreEntry>>,
}

#[derive(Debug, Deserialize)]
struct ScoreEntry {
    name: String,
    /// The API reports scores as strings.
    score: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// The Odds API feed client.
pub struct TheOddsApiClient {
    http: Client,
    api_key: String,
    /// Comma-separated region keys, e.g. "us".
    regions: String,
    /// Bookmaker keys to restrict quotes to; empty means the region's
    /// full set.
    bookmakers: Vec<String>,
}

impl TheOddsApiClient {
    pub fn new(api_key: String, regions: String, bookmakers: Vec<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("oddslip/0.1.0 (bet-slip client)")
            .build()
            .context("Failed to build HTTP client for The Odds API")?;

        Ok(Self {
            http,
            api_key,
            regions,
            bookmakers,
        })
    }

    // -- Internal helpers ------------------------------------------------

    async fn fetch_odds(&self, sport: &str) -> Result<Vec<OddsEvent>> {
        // The URL carries the api key; keep it out of the logs.
        let mut url = format!(
            "{BASE_URL}/sports/{}/odds?apiKey={}&regions={}&markets={MARKETS}&oddsFormat=american",
            urlencoding::encode(sport),
            self.api_key,
            self.regions,
        );
        if !self.bookmakers.is_empty() {
            url.push_str("&bookmakers=");
            url.push_str(&self.bookmakers.join(","));
        }

        debug!(sport = %sport, "Fetching odds");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("The Odds API odds request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("The Odds API error {status}: {body}");
        }

        let events: Vec<OddsEvent> = resp
            .json()
            .await
            .context("Failed to parse The Odds API odds response")?;

        Ok(events)
    }

    async fn fetch_scores(&self, sport: &str) -> Result<Vec<ScoreEvent>> {
        let url = format!(
            "{BASE_URL}/sports/{}/scores?apiKey={}&daysFrom={SCORES_DAYS_FROM}",
            urlencoding::encode(sport),
            self.api_key,
        );

        debug!(sport = %sport, "Fetching scores");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("The Odds API scores request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("The Odds API scores error {status}: {body}");
        }

        let events: Vec<ScoreEvent> = resp
            .json()
            .await
            .context("Failed to parse The Odds API scores response")?;

        Ok(events)
    }

    /// First posted outcome for a market across the event's bookmakers.
    fn find_outcome<'a>(
        event: &'a OddsEvent,
        market_key: &str,
        outcome_name: &str,
    ) -> Option<&'a OutcomeDto> {
        event.bookmakers.iter().find_map(|book| {
            book.markets
                .iter()
                .find(|market| market.key == market_key)?
                .outcomes
                .iter()
                .find(|outcome| outcome.name == outcome_name)
        })
    }

    /// The board price for one side of a market, falling back to the
    /// default line when no book has posted it (or posted garbage).
    fn offered_or(
        event: &OddsEvent,
        market_key: &str,
        outcome_name: &str,
        fallback: OfferedPrice,
    ) -> OfferedPrice {
        let outcome = match Self::find_outcome(event, market_key, outcome_name) {
            Some(outcome) => outcome,
            None => return fallback,
        };
        match AmericanOdds::new(outcome.price.round() as i64) {
            Ok(price) => OfferedPrice {
                point: outcome.point,
                price,
            },
            Err(_) => {
                warn!(
                    outcome = %outcome_name,
                    price = outcome.price,
                    "Feed returned an undefined American price, using fallback"
                );
                fallback
            }
        }
    }

    /// One bookmaker's slots across the board's markets.
    fn book_offer(book: &BookmakerDto, home_team: &str, away_team: &str) -> BookOffer {
        let mut offer = BookOffer {
            key: book.key.clone(),
            title: book.title.clone(),
            ..Default::default()
        };
        for market in &book.markets {
            for outcome in &market.outcomes {
                let price = match AmericanOdds::new(outcome.price.round() as i64) {
                    Ok(price) => price,
                    Err(_) => continue,
                };
                let slot = match (market.key.as_str(), outcome.name.as_str()) {
                    ("spreads", name) if name == home_team => &mut offer.spread_home,
                    ("spreads", name) if name == away_team => &mut offer.spread_away,
                    ("totals", "Over") => &mut offer.total_over,
                    ("totals", "Under") => &mut offer.total_under,
                    ("h2h", name) if name == home_team => &mut offer.moneyline_home,
                    ("h2h", name) if name == away_team => &mut offer.moneyline_away,
                    _ => continue,
                };
                *slot = Some(price);
            }
        }
        offer
    }

    fn team_score(event: &ScoreEvent, team: &str) -> Option<u32> {
        event
            .scores
            .as_ref()?
            .iter()
            .find(|entry| entry.name == team)?
            .score
            .parse()
            .ok()
    }

    /// Merge one odds event and its (optional) score event into a board.
    fn to_board(event: OddsEvent, score: Option<&ScoreEvent>, now: DateTime<Utc>) -> GameBoard {
        let spread_home = Self::offered_or(
            &event,
            "spreads",
            &event.home_team,
            OfferedPrice {
                point: Some(FALLBACK_SPREAD_POINT),
                price: FALLBACK_JUICE,
            },
        );
        let spread_away = Self::offered_or(
            &event,
            "spreads",
            &event.away_team,
            OfferedPrice {
                point: Some(-FALLBACK_SPREAD_POINT),
                price: FALLBACK_JUICE,
            },
        );
        let total_over = Self::offered_or(
            &event,
            "totals",
            "Over",
            OfferedPrice {
                point: Some(FALLBACK_TOTAL_POINT),
                price: FALLBACK_JUICE,
            },
        );
        let total_under = Self::offered_or(
            &event,
            "totals",
            "Under",
            OfferedPrice {
                point: Some(FALLBACK_TOTAL_POINT),
                price: FALLBACK_JUICE,
            },
        );
        let moneyline_home = Self::offered_or(
            &event,
            "h2h",
            &event.home_team,
            OfferedPrice {
                point: None,
                price: FALLBACK_ML_HOME,
            },
        );
        let moneyline_away = Self::offered_or(
            &event,
            "h2h",
            &event.away_team,
            OfferedPrice {
                point: None,
                price: FALLBACK_ML_AWAY,
            },
        );

        let book_offers = event
            .bookmakers
            .iter()
            .map(|book| Self::book_offer(book, &event.home_team, &event.away_team))
            .collect();

        let (home_score, away_score, completed) = match score {
            Some(score) => (
                Self::team_score(score, &event.home_team),
                Self::team_score(score, &event.away_team),
                score.completed,
            ),
            None => (None, None, false),
        };
        let commenced = event.commence_time <= now;
        let is_live =
            commenced && !completed && (home_score.is_some() || away_score.is_some());

        GameBoard {
            id: event.id,
            league: event.sport_title,
            home_team: event.home_team,
            away_team: event.away_team,
            commence_time: event.commence_time,
            is_live,
            home_score,
            away_score,
            spread_home,
            spread_away,
            total_over,
            total_under,
            moneyline_home,
            moneyline_away,
            book_offers,
        }
    }
}

// ---------------------------------------------------------------------------
// OddsFeed trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl OddsFeed for TheOddsApiClient {
    /// Fetch odds and scores concurrently and merge them into boards.
    ///
    /// The odds response is required; a scores failure degrades to
    /// boards without liveness rather than failing the fetch.
    async fn fetch_games(&self, sport: &str) -> Result<Vec<GameBoard>> {
        info!(sport = %sport, "Fetching game boards");

        let (events, scores) =
            future::join(self.fetch_odds(sport), self.fetch_scores(sport)).await;
        let events = events?;
        let scores = match scores {
            Ok(scores) => scores,
            Err(e) => {
                warn!(error = %e, "Scores fetch failed, boards will not carry liveness");
                Vec::new()
            }
        };

        let by_id: HashMap<&str, &ScoreEvent> =
            scores.iter().map(|score| (score.id.as_str(), score)).collect();
        let now = Utc::now();

        let boards: Vec<GameBoard> = events
            .into_iter()
            .map(|event| {
                let score = by_id.get(event.id.as_str()).copied();
                Self::to_board(event, score, now)
            })
            .collect();

        info!(sport = %sport, boards = boards.len(), "Game boards assembled");
        Ok(boards)
    }

    fn name(&self) -> &str {
        FEED_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
