//! Supported currencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseCurrencyError;

/// Currency code from the supported set.
///
/// Parsing is case-insensitive; the canonical form is lowercase, which is
/// also what the rate feed uses for its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyCode {
    Jpy,
    Usd,
    Eur,
    Gbp,
    Aud,
    Cad,
    Chf,
    Cny,
    Krw,
}

impl CurrencyCode {
    /// All supported codes, in display order.
    pub const ALL: [CurrencyCode; 9] = [
        CurrencyCode::Jpy,
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
        CurrencyCode::Aud,
        CurrencyCode::Cad,
        CurrencyCode::Chf,
        CurrencyCode::Cny,
        CurrencyCode::Krw,
    ];

    /// Canonical lowercase code.
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Jpy => "jpy",
            CurrencyCode::Usd => "usd",
            CurrencyCode::Eur => "eur",
            CurrencyCode::Gbp => "gbp",
            CurrencyCode::Aud => "aud",
            CurrencyCode::Cad => "cad",
            CurrencyCode::Chf => "chf",
            CurrencyCode::Cny => "cny",
            CurrencyCode::Krw => "krw",
        }
    }

    /// Uppercase code for display ("USD").
    pub fn upper(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// Get the standard decimal places for this currency.
    pub fn decimal_places(&self) -> usize {
        match self {
            CurrencyCode::Jpy | CurrencyCode::Krw => 0,
            _ => 2,
        }
    }

    /// Catalogue entry for this code.
    pub fn currency(&self) -> &'static Currency {
        // CURRENCIES is ordered like ALL
        &CURRENCIES[*self as usize]
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        CurrencyCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == normalized)
            .ok_or_else(|| ParseCurrencyError::Unsupported(s.trim().to_string()))
    }
}

/// A supported currency with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: CurrencyCode,
    pub display_name: &'static str,
    pub symbol: &'static str,
}

/// The supported currency catalogue, in display order.
pub static CURRENCIES: [Currency; 9] = [
    Currency {
        code: CurrencyCode::Jpy,
        display_name: "Japanese Yen",
        symbol: "¥",
    },
    Currency {
        code: CurrencyCode::Usd,
        display_name: "US Dollar",
        symbol: "$",
    },
    Currency {
        code: CurrencyCode::Eur,
        display_name: "Euro",
        symbol: "€",
    },
    Currency {
        code: CurrencyCode::Gbp,
        display_name: "British Pound",
        symbol: "£",
    },
    Currency {
        code: CurrencyCode::Aud,
        display_name: "Australian Dollar",
        symbol: "A$",
    },
    Currency {
        code: CurrencyCode::Cad,
        display_name: "Canadian Dollar",
        symbol: "C$",
    },
    Currency {
        code: CurrencyCode::Chf,
        display_name: "Swiss Franc",
        symbol: "CHF",
    },
    Currency {
        code: CurrencyCode::Cny,
        display_name: "Chinese Yuan",
        symbol: "CN¥",
    },
    Currency {
        code: CurrencyCode::Krw,
        display_name: "South Korean Won",
        symbol: "₩",
    },
];

/// All supported currencies.
pub fn currencies() -> &'static [Currency] {
    &CURRENCIES
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.code.upper())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::Usd);
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::Usd);
        assert_eq!(" Eur ".parse::<CurrencyCode>().unwrap(), CurrencyCode::Eur);
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "xyz".parse::<CurrencyCode>().unwrap_err();
        assert_eq!(err, ParseCurrencyError::Unsupported("xyz".to_string()));
    }

    #[test]
    fn test_catalogue_matches_codes() {
        for code in CurrencyCode::ALL {
            assert_eq!(code.currency().code, code);
        }
        assert_eq!(currencies().len(), CurrencyCode::ALL.len());
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&CurrencyCode::Gbp).unwrap();
        assert_eq!(json, "\"gbp\"");

        let code: CurrencyCode = serde_json::from_str("\"krw\"").unwrap();
        assert_eq!(code, CurrencyCode::Krw);
    }

    #[test]
    fn test_currency_decimal_places() {
        assert_eq!(CurrencyCode::Usd.decimal_places(), 2);
        assert_eq!(CurrencyCode::Jpy.decimal_places(), 0);
        assert_eq!(CurrencyCode::Krw.decimal_places(), 0);
    }
}
