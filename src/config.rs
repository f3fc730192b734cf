//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (API keys) are referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`. Every section has defaults,
//! so a missing or partial file still yields a runnable client.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::slip::wallet;

/// Top-level application configuration.
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub wallet: WalletConfig,
}

/// `[feed]` — the remote odds source.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    /// When false the client runs on the built-in sample boards.
    pub enabled: bool,
    /// Sport key passed to the feed, e.g. "basketball_nba".
    pub sport: String,
    /// Comma-separated region keys.
    pub regions: String,
    /// Bookmaker keys to restrict quotes to; empty means the region's
    /// full set.
    pub bookmakers: Vec<String>,
    /// Environment variable holding the feed API key.
    pub api_key_env: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            enabled: false,
            sport: "basketball_nba".to_string(),
            regions: "us".to_string(),
            bookmakers: Vec::new(),
            api_key_env: "ODDS_API_KEY".to_string(),
        }
    }
}

/// `[wallet]` — opening balances for the two ledgers.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WalletConfig {
    pub cash: f64,
    pub coins: f64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            cash: wallet::DEFAULT_CASH,
            coins: wallet::DEFAULT_COINS,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
