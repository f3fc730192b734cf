//! Demo ledgers backing the slip.
//!
//! Two fixed, independent balances. Debits floor at zero and wins never
//! credit back; there is no settlement source behind the client, so the
//! wallet only ever pays out in spirit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Currency;

/// Opening balances, matching the demo accounts.
pub const DEFAULT_CASH: f64 = 1250.0;
pub const DEFAULT_COINS: f64 = 999.0;

/// The two currency ledgers. No conversion between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    cash: f64,
    coins: f64,
}

impl Default for Wallet {
    fn default() -> Self {
        Wallet {
            cash: DEFAULT_CASH,
            coins: DEFAULT_COINS,
        }
    }
}

impl Wallet {
    pub fn new(cash: f64, coins: f64) -> Self {
        Wallet { cash, coins }
    }

    /// Current balance of one ledger.
    pub fn balance(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Usd => self.cash,
            Currency::Btc => self.coins,
        }
    }

    /// Debit a ledger, flooring at zero. Returns the new balance.
    /// Amounts are validated positive before they reach the ledger.
    pub fn debit(&mut self, currency: Currency, amount: f64) -> f64 {
        let slot = match currency {
            Currency::Usd => &mut self.cash,
            Currency::Btc => &mut self.coins,
        };
        *slot = (*slot - amount).max(0.0);
        *slot
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "USD ${:.2} | BTC ₿{:.2}", self.cash, self.coins)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_balances() {
        let wallet = Wallet::default();
        assert!((wallet.balance(Currency::Usd) - 1250.0).abs() < 1e-12);
        assert!((wallet.balance(Currency::Btc) - 999.0).abs() < 1e-12);
    }

    #[test]
    fn test_debit_reduces_one_ledger_only() {
        let mut wallet = Wallet::default();
        let after = wallet.debit(Currency::Usd, 25.0);
        assert!((after - 1225.0).abs() < 1e-12);
        assert!((wallet.balance(Currency::Btc) - 999.0).abs() < 1e-12);
    }

    #[test]
    fn test_debit_floors_at_zero() {
        let mut wallet = Wallet::new(500.0, 999.0);
        let after = wallet.debit(Currency::Usd, 1000.0);
        assert_eq!(after, 0.0);
        assert_eq!(wallet.balance(Currency::Usd), 0.0);
    }

    #[test]
    fn test_debit_exact_balance_empties_ledger() {
        let mut wallet = Wallet::new(100.0, 0.0);
        assert_eq!(wallet.debit(Currency::Usd, 100.0), 0.0);
    }

    #[test]
    fn test_display() {
        let wallet = Wallet::default();
        let display = format!("{wallet}");
        assert!(display.contains("$1250.00"));
        assert!(display.contains("₿999.00"));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut wallet = Wallet::default();
        wallet.debit(Currency::Btc, 99.0);
        let json = serde_json::to_string(&wallet).unwrap();
        let parsed: Wallet = serde_json::from_str(&json).unwrap();
        assert!((parsed.balance(Currency::Btc) - 900.0).abs() < 1e-12);
    }
}
