//! Currency conversion and bidirectional rate derivation.
//!
//! All functions are pure. Tables are quoted against a pivot currency and
//! every cross-pair conversion routes through it. Arithmetic is plain `f64`
//! with no rounding; rounding happens only when formatting for display.

use dailyrate_common::{CurrencyCode, RateTable};
use serde::Serialize;

use crate::error::{FxError, FxResult};
use crate::format::{format_rate, optimal_multiplier, Multiplier};

/// One direction of a quoted rate, scaled by a multiplier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateQuote {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    /// Units of `to` per `multiplier` units of `from`.
    pub rate: f64,
    pub multiplier: Multiplier,
    /// e.g. "100 JPY = 0.6700 USD"
    pub display: String,
}

impl RateQuote {
    fn new(from: CurrencyCode, to: CurrencyCode, rate: f64, multiplier: Multiplier) -> Self {
        let display = format!(
            "{} {} = {} {}",
            multiplier,
            from.upper(),
            format_rate(rate),
            to.upper()
        );
        Self {
            from,
            to,
            rate,
            multiplier,
            display,
        }
    }
}

/// A rate quoted in both directions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidirectionalRate {
    pub forward: RateQuote,
    pub reverse: RateQuote,
}

/// Outcome of converting an amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionResult {
    pub result_amount: f64,
    /// Units of the target currency per unit of the source currency.
    pub effective_rate: f64,
}

/// Rates between `pivot` and `target` in both directions, scaled by `multiplier`.
///
/// Returns `None` when `target` has no rate in `table`.
pub fn bidirectional_rates(
    pivot: CurrencyCode,
    target: CurrencyCode,
    table: &RateTable,
    multiplier: Multiplier,
) -> Option<BidirectionalRate> {
    let rate = table.get(target)?;
    let m = multiplier.factor();

    Some(BidirectionalRate {
        forward: RateQuote::new(pivot, target, rate * m, multiplier),
        reverse: RateQuote::new(target, pivot, (1.0 / rate) * m, multiplier),
    })
}

/// Rate board for every supported currency in `table`, in catalogue order.
///
/// With no multiplier given, each row uses the optimal multiplier for its
/// forward rate.
pub fn rate_rows(table: &RateTable, multiplier: Option<Multiplier>) -> Vec<BidirectionalRate> {
    let pivot = table.base();
    CurrencyCode::ALL
        .iter()
        .copied()
        .filter(|code| *code != pivot)
        .filter_map(|target| {
            let m = match multiplier {
                Some(m) => m,
                None => optimal_multiplier(table.get(target)?),
            };
            bidirectional_rates(pivot, target, table, m)
        })
        .collect()
}

/// Convert `amount` of `from` into `to` using a table quoted against its pivot.
pub fn convert(
    from: CurrencyCode,
    to: CurrencyCode,
    amount: f64,
    table: &RateTable,
) -> FxResult<ConversionResult> {
    let pivot = table.base();

    if from == to {
        return Ok(ConversionResult {
            result_amount: amount,
            effective_rate: 1.0,
        });
    }

    let lookup = |code: CurrencyCode| table.get(code).ok_or_else(|| FxError::unknown(code));

    let result = if from == pivot {
        let to_rate = lookup(to)?;
        ConversionResult {
            result_amount: amount * to_rate,
            effective_rate: to_rate,
        }
    } else if to == pivot {
        let from_rate = lookup(from)?;
        ConversionResult {
            result_amount: amount / from_rate,
            effective_rate: 1.0 / from_rate,
        }
    } else {
        let from_rate = lookup(from)?;
        let to_rate = lookup(to)?;
        ConversionResult {
            result_amount: (amount / from_rate) * to_rate,
            effective_rate: to_rate / from_rate,
        }
    };

    Ok(result)
}

/// Parse user amount input.
///
/// Accepts grouping separators ("1,000.5") only at thousands positions.
/// Empty, non-numeric, non-finite, zero, and negative inputs are rejected so
/// conversion is never attempted.
pub fn parse_amount(input: &str) -> FxResult<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !grouping_is_valid(trimmed) {
        return Err(FxError::EmptyOrInvalidAmount(input.to_string()));
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(FxError::EmptyOrInvalidAmount(input.to_string())),
    }
}

/// Commas may only appear in the integer part, every three digits.
fn grouping_is_valid(input: &str) -> bool {
    if !input.contains(',') {
        return true;
    }

    let (integer, fraction) = match input.find('.') {
        Some(idx) => input.split_at(idx),
        None => (input, ""),
    };
    if fraction.contains(',') {
        return false;
    }

    let mut groups = integer.split(',');
    let leading = groups.next().unwrap_or_default();
    let leading_digits = leading.trim_start_matches(['+', '-']).len();
    (1..=3).contains(&leading_digits) && groups.all(|group| group.len() == 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn jpy_table() -> RateTable {
        RateTable::from_rates(
            CurrencyCode::Jpy,
            [
                (CurrencyCode::Usd, 0.0067),
                (CurrencyCode::Eur, 0.0062),
                (CurrencyCode::Gbp, 0.0053),
                (CurrencyCode::Krw, 9.12),
            ],
        )
        .unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_convert_from_pivot() {
        let table = RateTable::from_rates(CurrencyCode::Jpy, [(CurrencyCode::Usd, 0.0067)]).unwrap();

        let result = convert(CurrencyCode::Jpy, CurrencyCode::Usd, 1000.0, &table).unwrap();

        assert!(approx(result.result_amount, 6.7));
        assert_eq!(result.effective_rate, 0.0067);
    }

    #[test]
    fn test_convert_to_pivot() {
        let table = jpy_table();

        let result = convert(CurrencyCode::Usd, CurrencyCode::Jpy, 6.7, &table).unwrap();

        assert!(approx(result.result_amount, 1000.0));
        assert!(approx(result.effective_rate, 1.0 / 0.0067));
    }

    #[test]
    fn test_convert_cross_pair() {
        let table = jpy_table();

        let result = convert(CurrencyCode::Usd, CurrencyCode::Eur, 100.0, &table).unwrap();

        assert!(approx(result.result_amount, (100.0 / 0.0067) * 0.0062));
        assert!(approx(result.effective_rate, 0.0062 / 0.0067));
    }

    #[test]
    fn test_convert_same_currency() {
        let table = jpy_table();

        let result = convert(CurrencyCode::Chf, CurrencyCode::Chf, 42.5, &table).unwrap();

        assert_eq!(result.result_amount, 42.5);
        assert_eq!(result.effective_rate, 1.0);
    }

    #[test]
    fn test_convert_unknown_currency() {
        let table = jpy_table();

        let err = convert(CurrencyCode::Usd, CurrencyCode::Chf, 10.0, &table).unwrap_err();
        assert_eq!(err, FxError::UnknownCurrency("CHF".to_string()));

        let err = convert(CurrencyCode::Aud, CurrencyCode::Jpy, 10.0, &table).unwrap_err();
        assert_eq!(err, FxError::UnknownCurrency("AUD".to_string()));
    }

    #[test]
    fn test_bidirectional_rates() {
        let table = RateTable::from_rates(CurrencyCode::Jpy, [(CurrencyCode::Usd, 0.0067)]).unwrap();

        let rates =
            bidirectional_rates(CurrencyCode::Jpy, CurrencyCode::Usd, &table, Multiplier::Hundred)
                .unwrap();

        assert!(approx(rates.forward.rate, 0.67));
        assert!(approx(rates.reverse.rate, 14925.373134328358));
        assert_eq!(rates.forward.from, CurrencyCode::Jpy);
        assert_eq!(rates.reverse.from, CurrencyCode::Usd);
        assert_eq!(rates.forward.display, "100 JPY = 0.6700 USD");
        assert_eq!(rates.reverse.display, "100 USD = 14,925.37 JPY");
    }

    #[test]
    fn test_bidirectional_rates_missing_target() {
        let table = jpy_table();
        assert!(
            bidirectional_rates(CurrencyCode::Jpy, CurrencyCode::Cad, &table, Multiplier::One)
                .is_none()
        );
    }

    #[test]
    fn test_rate_rows_auto_multiplier() {
        let table = jpy_table();

        let rows = rate_rows(&table, None);

        let targets: Vec<_> = rows.iter().map(|r| r.forward.to).collect();
        assert_eq!(
            targets,
            vec![CurrencyCode::Usd, CurrencyCode::Eur, CurrencyCode::Gbp, CurrencyCode::Krw]
        );
        assert_eq!(rows[0].forward.multiplier, Multiplier::TenThousand);
        assert_eq!(rows[3].forward.multiplier, Multiplier::Ten);
    }

    #[test]
    fn test_rate_rows_fixed_multiplier() {
        let rows = rate_rows(&jpy_table(), Some(Multiplier::One));
        assert!(rows.iter().all(|r| r.forward.multiplier == Multiplier::One));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1000").unwrap(), 1000.0);
        assert_eq!(parse_amount(" 1,234.5 ").unwrap(), 1234.5);

        for bad in ["", "   ", "abc", "0", "-5", "NaN", "inf"] {
            assert!(
                matches!(parse_amount(bad), Err(FxError::EmptyOrInvalidAmount(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_amount_grouping() {
        assert_eq!(parse_amount("12,345,678").unwrap(), 12_345_678.0);
        assert_eq!(parse_amount("999,000.25").unwrap(), 999_000.25);

        for bad in ["1,2,3", "1,0000", ",100", "1000,000", "1.000,5", "1,000,"] {
            assert!(
                matches!(parse_amount(bad), Err(FxError::EmptyOrInvalidAmount(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    fn any_code() -> impl Strategy<Value = CurrencyCode> {
        prop::sample::select(vec![
            CurrencyCode::Jpy,
            CurrencyCode::Usd,
            CurrencyCode::Eur,
            CurrencyCode::Gbp,
            CurrencyCode::Krw,
        ])
    }

    proptest! {
        #[test]
        fn prop_round_trip(from in any_code(), to in any_code(), amount in 0.01f64..1e9) {
            let table = jpy_table();
            let there = convert(from, to, amount, &table).unwrap();
            let back = convert(to, from, there.result_amount, &table).unwrap();
            prop_assert!(approx(back.result_amount, amount));
        }

        #[test]
        fn prop_identity(code in any_code(), amount in -1e9f64..1e9) {
            let result = convert(code, code, amount, &jpy_table()).unwrap();
            prop_assert_eq!(result.result_amount, amount);
        }

        #[test]
        fn prop_bidirectional_scaling(
            target in prop::sample::select(vec![CurrencyCode::Usd, CurrencyCode::Eur, CurrencyCode::Krw]),
            multiplier in prop::sample::select(Multiplier::ALL.to_vec()),
        ) {
            let table = jpy_table();
            let rate = table.get(target).unwrap();
            let rates = bidirectional_rates(CurrencyCode::Jpy, target, &table, multiplier).unwrap();
            prop_assert_eq!(rates.forward.rate, rate * multiplier.factor());
            prop_assert_eq!(rates.reverse.rate, (1.0 / rate) * multiplier.factor());
        }
    }
}
