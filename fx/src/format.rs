//! Display formatting for rates and amounts.
//!
//! Everything here is pure and locale-independent: `,` groups thousands and
//! `.` separates decimals.

use dailyrate_common::CurrencyCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display scaling factor applied to rates for readability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum Multiplier {
    One,
    Ten,
    Hundred,
    Thousand,
    TenThousand,
}

impl Multiplier {
    pub const ALL: [Multiplier; 5] = [
        Multiplier::One,
        Multiplier::Ten,
        Multiplier::Hundred,
        Multiplier::Thousand,
        Multiplier::TenThousand,
    ];

    /// Integer scaling factor.
    pub fn value(&self) -> u32 {
        match self {
            Multiplier::One => 1,
            Multiplier::Ten => 10,
            Multiplier::Hundred => 100,
            Multiplier::Thousand => 1000,
            Multiplier::TenThousand => 10000,
        }
    }

    /// Scaling factor as `f64`, for rate arithmetic.
    pub fn factor(&self) -> f64 {
        f64::from(self.value())
    }
}

impl From<Multiplier> for u32 {
    fn from(m: Multiplier) -> Self {
        m.value()
    }
}

impl TryFrom<u32> for Multiplier {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Multiplier::ALL
            .iter()
            .copied()
            .find(|m| m.value() == value)
            .ok_or_else(|| format!("unsupported multiplier: {}", value))
    }
}

impl FromStr for Multiplier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .replace(',', "")
            .parse()
            .map_err(|_| format!("unsupported multiplier: {}", s))?;
        Multiplier::try_from(value)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&group_thousands(&self.value().to_string()))
    }
}

/// Decimal places to show for `rate`.
///
/// Rules are checked top to bottom; the first match wins.
pub fn select_precision(rate: f64) -> usize {
    if rate > 100.0 {
        2
    } else if rate > 10.0 {
        3
    } else if rate < 0.01 {
        6
    } else {
        4
    }
}

/// Insert `,` every three digits in the integer part of a numeric string.
///
/// The fractional part and a leading minus sign are left untouched.
pub fn group_thousands(numeric: &str) -> String {
    let (sign, unsigned) = match numeric.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", numeric),
    };
    let (integer, fraction) = match unsigned.find('.') {
        Some(idx) => unsigned.split_at(idx),
        None => (unsigned, ""),
    };

    let digits = integer.chars().count();
    let mut grouped = String::with_capacity(numeric.len() + digits / 3);
    grouped.push_str(sign);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.push_str(fraction);
    grouped
}

/// Multiplier that brings `rate` into a readable range.
pub fn optimal_multiplier(rate: f64) -> Multiplier {
    if rate < 0.01 {
        Multiplier::TenThousand
    } else if rate < 0.1 {
        Multiplier::Thousand
    } else if rate < 1.0 {
        Multiplier::Hundred
    } else if rate < 10.0 {
        Multiplier::Ten
    } else {
        Multiplier::One
    }
}

/// Render a rate with its selected precision and grouping.
pub fn format_rate(rate: f64) -> String {
    group_thousands(&format!("{:.*}", select_precision(rate), rate))
}

/// Render an amount in `code` with the currency symbol.
///
/// Zero-decimal currencies (JPY, KRW) render without a fractional part. A
/// value that rounds to zero carries no minus sign.
pub fn format_amount(value: f64, code: CurrencyCode) -> String {
    let symbol = code.currency().symbol;
    let rounded = format!("{:.*}", code.decimal_places(), value.abs());
    let negative = value < 0.0 && rounded.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let digits = group_thousands(&rounded);
    if negative {
        format!("-{}{}", symbol, digits)
    } else {
        format!("{}{}", symbol, digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_select_precision() {
        assert_eq!(select_precision(0.005), 6);
        assert_eq!(select_precision(150.0), 2);
        assert_eq!(select_precision(100.0), 3);
        assert_eq!(select_precision(10.5), 3);
        assert_eq!(select_precision(10.0), 4);
        assert_eq!(select_precision(0.01), 4);
        assert_eq!(select_precision(0.67), 4);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1234567.8900"), "1,234,567.8900");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-1234.5"), "-1,234.5");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("0.123456"), "0.123456");
        assert_eq!(group_thousands("-100000"), "-100,000");
    }

    #[test]
    fn test_group_thousands_leaves_fraction() {
        assert_eq!(group_thousands("12.3456789"), "12.3456789");
    }

    #[test]
    fn test_optimal_multiplier_bands() {
        assert_eq!(optimal_multiplier(0.0067), Multiplier::TenThousand);
        assert_eq!(optimal_multiplier(0.01), Multiplier::Thousand);
        assert_eq!(optimal_multiplier(0.05), Multiplier::Thousand);
        assert_eq!(optimal_multiplier(0.5), Multiplier::Hundred);
        assert_eq!(optimal_multiplier(1.0), Multiplier::Ten);
        assert_eq!(optimal_multiplier(9.99), Multiplier::Ten);
        assert_eq!(optimal_multiplier(10.0), Multiplier::One);
        assert_eq!(optimal_multiplier(1400.0), Multiplier::One);
    }

    #[test]
    fn test_multiplier_parse_and_display() {
        assert_eq!("100".parse::<Multiplier>().unwrap(), Multiplier::Hundred);
        assert_eq!("10,000".parse::<Multiplier>().unwrap(), Multiplier::TenThousand);
        assert!("5".parse::<Multiplier>().is_err());
        assert_eq!(Multiplier::TenThousand.to_string(), "10,000");
    }

    #[test]
    fn test_multiplier_serde() {
        assert_eq!(serde_json::to_string(&Multiplier::Thousand).unwrap(), "1000");
        let m: Multiplier = serde_json::from_str("10").unwrap();
        assert_eq!(m, Multiplier::Ten);
        assert!(serde_json::from_str::<Multiplier>("7").is_err());
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.0067), "0.006700");
        assert_eq!(format_rate(0.67), "0.6700");
        assert_eq!(format_rate(14925.373134), "14,925.37");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234567.891, CurrencyCode::Usd), "$1,234,567.89");
        assert_eq!(format_amount(1500.4, CurrencyCode::Jpy), "¥1,500");
        assert_eq!(format_amount(-12.5, CurrencyCode::Eur), "-€12.50");
    }

    #[test]
    fn test_format_amount_negative_zero() {
        assert_eq!(format_amount(-0.004, CurrencyCode::Usd), "$0.00");
        assert_eq!(format_amount(-0.4, CurrencyCode::Jpy), "¥0");
        assert_eq!(format_amount(-0.006, CurrencyCode::Usd), "-$0.01");
    }

    proptest! {
        #[test]
        fn prop_optimal_multiplier_non_increasing(a in 1e-6f64..1e6, b in 1e-6f64..1e6) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(optimal_multiplier(lo) >= optimal_multiplier(hi));
        }

        #[test]
        fn prop_grouping_preserves_digits(n in any::<i64>()) {
            let plain = n.to_string();
            let grouped = group_thousands(&plain);
            prop_assert_eq!(grouped.replace(',', ""), plain);
        }
    }
}
