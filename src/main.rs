//! ODDSLIP — Odds Engine & Bet-Slip State Machine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! fetches game boards (or falls back to the built-in samples), and
//! drives a scripted slip session: a single pick with tier snapping, a
//! two-leg parlay, a custom-priced order, and settlement.

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use oddslip::config::AppConfig;
use oddslip::feed::the_odds_api::TheOddsApiClient;
use oddslip::feed::{self, GameBoard, OddsFeed};
use oddslip::odds::{vig, AmericanOdds};
use oddslip::slip::wallet::Wallet;
use oddslip::slip::SlipEngine;
use oddslip::types::{Currency, MarketKind, PickSide};

const BANNER: &str = r#"
  ___  ____  ____  ____  _     ___ ____
 / _ \|  _ \|  _ \/ ___|| |   |_ _|  _ \
| | | | | | | | | \___ \| |    | || |_) |
| |_| | |_| | |_| |___) | |___ | ||  __/
 \___/|____/|____/|____/|_____|___|_|

  Odds Engine & Bet-Slip State Machine
  v0.1.0 — p2p sports book client
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        feed_enabled = cfg.feed.enabled,
        sport = %cfg.feed.sport,
        cash = format!("${:.2}", cfg.wallet.cash),
        coins = format!("₿{:.2}", cfg.wallet.coins),
        "ODDSLIP starting up"
    );

    // -- Boards ------------------------------------------------------------

    let boards = fetch_boards(&cfg).await;
    for board in &boards {
        info!(board = %board, commence = %board.commence_time, "Board available");
    }

    let mut engine = SlipEngine::new(Wallet::new(cfg.wallet.cash, cfg.wallet.coins));

    // -- Single pick with a book tier ---------------------------------------

    let board = &boards[0];
    let leg = board.leg(MarketKind::Spread, PickSide::Home);
    info!(leg = %leg, "Building a single pick");

    // Price comparison against the leg's books (or the synthetic ones).
    for quote in leg.comparison_quotes()? {
        let savings = vig::savings_pct(leg.price, quote.price);
        info!(
            book = %quote.title,
            price = %quote.price,
            savings = format!("{:+.1}%", savings),
            "Price comparison"
        );
    }

    engine.toggle(leg);
    let wager = 100.0;
    // Tier 0 cannot cover a 100 wager, so the pick snaps upward.
    let snapped = engine.pick_tier(0, wager)?;
    info!(tier = ?snapped, "Tier selected");

    let quote = engine.quote(wager)?;
    info!(quote = %quote, "Single pick quoted");
    let single = engine.place(wager, quote.price, quote.payout, Currency::Usd)?;
    if let Some(confirmation) = engine.acknowledge() {
        info!(kind = %confirmation, "Confirmation acknowledged");
    }

    // -- Two-leg parlay ------------------------------------------------------

    let second = boards.get(1).unwrap_or(board);
    engine.toggle(board.leg(MarketKind::Moneyline, PickSide::Away));
    engine.toggle(second.leg(MarketKind::Total, PickSide::Over));

    let quote = engine.quote(25.0)?;
    info!(quote = %quote, legs = engine.legs().len(), "Parlay quoted");
    let parlay = engine.place(25.0, quote.price, quote.payout, Currency::Usd)?;
    if let Some(confirmation) = engine.acknowledge() {
        info!(kind = %confirmation, "Confirmation acknowledged");
    }

    // -- Custom-priced order ---------------------------------------------------

    engine.toggle(board.leg(MarketKind::Moneyline, PickSide::Home));
    let make_price: AmericanOdds = "+150".parse()?;
    engine.set_custom_price(make_price);

    let quote = engine.quote(50.0)?;
    info!(quote = %quote, "Custom-priced order quoted");
    engine.place(50.0, quote.price, quote.payout, Currency::Btc)?;
    engine.acknowledge();

    // -- Settlement --------------------------------------------------------------

    engine.settle(&single.id, true);
    engine.settle(&parlay.id, false);

    // -- Portfolio ----------------------------------------------------------------

    let now = Utc::now();
    let portfolio = engine.portfolio();
    info!(
        live = portfolio.live(now).len(),
        pregame = portfolio.pregame(now).len(),
        "Liveness partition"
    );
    info!(summary = %portfolio.summary(), "Session complete");
    info!(wallet = %engine.wallet(), "Final balances");

    Ok(())
}

/// Boards from the configured feed, or the built-in samples when the
/// feed is disabled, keyless, or unreachable.
async fn fetch_boards(cfg: &AppConfig) -> Vec<GameBoard> {
    if !cfg.feed.enabled {
        info!("Feed disabled; using built-in sample boards");
        return feed::sample_boards();
    }

    let api_key = match AppConfig::resolve_env(&cfg.feed.api_key_env) {
        Ok(key) => key,
        Err(e) => {
            warn!(error = %e, "Feed key missing; using built-in sample boards");
            return feed::sample_boards();
        }
    };

    let client = match TheOddsApiClient::new(
        api_key,
        cfg.feed.regions.clone(),
        cfg.feed.bookmakers.clone(),
    ) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Feed client failed to build; using built-in sample boards");
            return feed::sample_boards();
        }
    };

    match client.fetch_games(&cfg.feed.sport).await {
        Ok(boards) if !boards.is_empty() => {
            info!(feed = client.name(), boards = boards.len(), "Boards fetched");
            boards
        }
        Ok(_) => {
            warn!("Feed returned no boards; using built-in sample boards");
            feed::sample_boards()
        }
        Err(e) => {
            warn!(error = %e, "Feed fetch failed; using built-in sample boards");
            feed::sample_boards()
        }
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oddslip=info"));

    let json_logging = std::env::var("ODDSLIP_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
