//! American-odds arithmetic.
//!
//! The engine prices everything through decimal multipliers; this module
//! owns the edges of that world: validating American prices, parsing and
//! rendering them, and converting between the two forms. Submodules
//! combine multipliers into parlays and apply the display-only book
//! margin.

pub mod parlay;
pub mod vig;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Conversion and parse failures. These are loud on purpose: an American
/// price of zero or a multiplier at or below 1.0 is a data bug upstream,
/// not something to paper over with a default.
#[derive(Debug, thiserror::Error)]
pub enum OddsError {
    #[error("American odds of zero are undefined")]
    ZeroAmerican,

    #[error("Cannot parse '{0}' as an American price")]
    Unparseable(String),

    #[error("Decimal odds must be finite and above 1.0, got {0}")]
    DecimalOutOfDomain(f64),
}

// ---------------------------------------------------------------------------
// American price
// ---------------------------------------------------------------------------

/// A signed American price. Never zero; `|value| >= 100` in the valid
/// betting domain. Serializes as the bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct AmericanOdds(i64);

impl AmericanOdds {
    /// Even money. Also the defined price of an empty parlay.
    pub const EVEN: AmericanOdds = AmericanOdds(100);

    /// Const constructor for known-valid literals (fixtures, fallback
    /// prices). Panics on zero, at compile time when used in a const.
    pub const fn from_const(value: i64) -> Self {
        if value == 0 {
            panic!("American odds of zero are undefined");
        }
        Self(value)
    }

    /// Validate a raw American value. Zero is the one undefined input.
    pub fn new(value: i64) -> Result<Self, OddsError> {
        if value == 0 {
            return Err(OddsError::ZeroAmerican);
        }
        Ok(Self(value))
    }

    /// The raw signed value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Decimal multiplier: `a/100 + 1` for positive prices, `100/|a| + 1`
    /// for negative ones. Always greater than 1.
    pub fn decimal(&self) -> f64 {
        if self.0 > 0 {
            self.0 as f64 / 100.0 + 1.0
        } else {
            100.0 / self.0.unsigned_abs() as f64 + 1.0
        }
    }

    /// Nearest American price for a decimal multiplier.
    ///
    /// The boundary is inclusive on the positive branch: exactly 2.0 maps
    /// to +100, never -100, so conversions cannot oscillate at even
    /// money. Multipliers at or below 1.0 (and non-finite values) are out
    /// of domain.
    pub fn from_decimal(decimal: f64) -> Result<Self, OddsError> {
        if !decimal.is_finite() || decimal <= 1.0 {
            return Err(OddsError::DecimalOutOfDomain(decimal));
        }
        let value = if decimal >= 2.0 {
            ((decimal - 1.0) * 100.0).round() as i64
        } else {
            (-100.0 / (decimal - 1.0)).round() as i64
        };
        Ok(Self(value))
    }
}

/// Renders with an explicit sign for positive prices: "+150", "-110".
impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for AmericanOdds {
    type Err = OddsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let value: i64 = digits
            .parse()
            .map_err(|_| OddsError::Unparseable(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<i64> for AmericanOdds {
    type Error = OddsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AmericanOdds> for i64 {
    fn from(odds: AmericanOdds) -> i64 {
        odds.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn odds(value: i64) -> AmericanOdds {
        AmericanOdds::new(value).unwrap()
    }

    // -- Decimal conversion tests --

    #[test]
    fn test_decimal_positive() {
        assert!((odds(150).decimal() - 2.5).abs() < 1e-12);
        assert!((odds(100).decimal() - 2.0).abs() < 1e-12);
        assert!((odds(275).decimal() - 3.75).abs() < 1e-12);
    }

    #[test]
    fn test_decimal_negative() {
        assert!((odds(-200).decimal() - 1.5).abs() < 1e-12);
        assert!((odds(-110).decimal() - (100.0 / 110.0 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_from_decimal_positive_branch() {
        assert_eq!(AmericanOdds::from_decimal(2.5).unwrap(), odds(150));
        assert_eq!(AmericanOdds::from_decimal(3.75).unwrap(), odds(275));
    }

    #[test]
    fn test_from_decimal_negative_branch() {
        assert_eq!(AmericanOdds::from_decimal(1.5).unwrap(), odds(-200));
        assert_eq!(
            AmericanOdds::from_decimal(100.0 / 110.0 + 1.0).unwrap(),
            odds(-110)
        );
    }

    #[test]
    fn test_even_money_boundary_maps_to_plus_100() {
        let at_two = AmericanOdds::from_decimal(2.0).unwrap();
        assert_eq!(at_two, odds(100));
        assert_eq!(format!("{at_two}"), "+100");
    }

    #[test]
    fn test_minus_100_canonicalizes_to_plus_100() {
        // -100 and +100 are the same multiplier; the inclusive positive
        // branch makes +100 the canonical rendering.
        assert!((odds(-100).decimal() - 2.0).abs() < 1e-12);
        assert_eq!(
            AmericanOdds::from_decimal(odds(-100).decimal()).unwrap(),
            odds(100)
        );
    }

    #[test]
    fn test_round_trip_over_valid_domain() {
        for value in 100..=2000i64 {
            let back = AmericanOdds::from_decimal(odds(value).decimal()).unwrap();
            assert_eq!(back, odds(value), "round trip failed for +{value}");
        }
        // -100 is the canonical alias of +100, so the negative sweep
        // starts at -101.
        for value in -2000..=-101i64 {
            let back = AmericanOdds::from_decimal(odds(value).decimal()).unwrap();
            assert_eq!(back, odds(value), "round trip failed for {value}");
        }
    }

    #[test]
    fn test_round_trip_longshots() {
        for value in [2500i64, 12500, 45000, -2500, -12500, -45000] {
            let back = AmericanOdds::from_decimal(odds(value).decimal()).unwrap();
            assert_eq!(back, odds(value));
        }
    }

    // -- Domain tests --

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(AmericanOdds::new(0), Err(OddsError::ZeroAmerican)));
        assert!(matches!(
            "0".parse::<AmericanOdds>(),
            Err(OddsError::ZeroAmerican)
        ));
    }

    #[test]
    fn test_from_decimal_out_of_domain() {
        for bad in [1.0, 0.5, 0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                AmericanOdds::from_decimal(bad),
                Err(OddsError::DecimalOutOfDomain(_))
            ));
        }
    }

    // -- Parse and render tests --

    #[test]
    fn test_parse_signed_and_unsigned() {
        assert_eq!("+150".parse::<AmericanOdds>().unwrap(), odds(150));
        assert_eq!("150".parse::<AmericanOdds>().unwrap(), odds(150));
        assert_eq!("-110".parse::<AmericanOdds>().unwrap(), odds(-110));
        assert_eq!(" -110 ".parse::<AmericanOdds>().unwrap(), odds(-110));
    }

    #[test]
    fn test_parse_garbage_rejected() {
        for bad in ["", "abc", "+", "-", "1.5", "+15x"] {
            assert!(matches!(
                bad.parse::<AmericanOdds>(),
                Err(OddsError::Unparseable(_))
            ));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", odds(150)), "+150");
        assert_eq!(format!("{}", odds(-110)), "-110");
    }

    #[test]
    fn test_serde_as_bare_integer() {
        let json = serde_json::to_string(&odds(-110)).unwrap();
        assert_eq!(json, "-110");
        let parsed: AmericanOdds = serde_json::from_str("150").unwrap();
        assert_eq!(parsed, odds(150));
        assert!(serde_json::from_str::<AmericanOdds>("0").is_err());
    }
}
