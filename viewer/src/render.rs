//! Plain-text rendering.

use chrono::SecondsFormat;

use dailyrate_common::{currencies, Timestamp};
use dailyrate_fx::format::{format_amount, format_rate};
use dailyrate_fx::{BidirectionalRate, Conversion, Phase, Provenance, RateBoard, ViewState};

fn provenance_label(provenance: Provenance) -> &'static str {
    match provenance {
        Provenance::Fetched => "",
        Provenance::Cached => " (cached)",
        Provenance::StaleFallback => " (cached, stale)",
    }
}

fn timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn rows(out: &mut String, rows: &[BidirectionalRate]) {
    let width = rows
        .iter()
        .map(|r| r.forward.display.chars().count())
        .max()
        .unwrap_or(0);

    for row in rows {
        out.push_str(&format!(
            "  {:<width$}   {}\n",
            row.forward.display,
            row.reverse.display,
            width = width
        ));
    }
}

/// The supported currency list.
pub fn render_currencies() -> String {
    let mut out = String::new();
    for currency in currencies() {
        out.push_str(&format!(
            "  {}  {:<4} {}\n",
            currency.code.upper(),
            currency.symbol,
            currency.display_name
        ));
    }
    out
}

/// A rate board.
pub fn render_board(board: &RateBoard) -> String {
    let mut out = format!(
        "Rates for {} as of {}{}\n",
        board.base.upper(),
        timestamp(board.fetched_at),
        provenance_label(board.provenance)
    );
    rows(&mut out, &board.rows);
    out
}

/// A single conversion line.
pub fn render_conversion(conversion: &Conversion) -> String {
    format!(
        "{} = {}  (1 {} = {} {}){}",
        format_amount(conversion.amount, conversion.from),
        format_amount(conversion.result.result_amount, conversion.to),
        conversion.from.upper(),
        format_rate(conversion.result.effective_rate),
        conversion.to.upper(),
        provenance_label(conversion.provenance)
    )
}

/// The whole interactive view.
pub fn render_state(state: &ViewState) -> String {
    let mut out = String::new();

    match &state.phase {
        Phase::Idle => {}
        Phase::Loading => out.push_str(&format!("Loading {} rates...\n", state.base.upper())),
        Phase::Failed { code, message } => out.push_str(&format!(
            "Could not load {} rates: {} [{}]\n",
            state.base.upper(),
            message,
            code
        )),
        Phase::Ready => {
            if let Some(snapshot) = &state.rates {
                out.push_str(&format!(
                    "Rates for {} as of {}{}\n",
                    state.base.upper(),
                    timestamp(snapshot.fetched_at),
                    state
                        .cache_indicator()
                        .map(|label| format!(" {}", label))
                        .unwrap_or_default()
                ));
            }
            rows(&mut out, &state.rows());
        }
    }

    out.push_str(&format!("Convert {} -> {}: ", state.from.upper(), state.to.upper()));
    match (&state.conversion, &state.conversion_error) {
        (_, Some(error)) => out.push_str(error),
        (Some(conversion), None) => out.push_str(&render_conversion(conversion)),
        (None, None) => out.push_str("enter an amount"),
    }
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dailyrate_common::{from_epoch_millis, CurrencyCode};
    use dailyrate_fx::{ConversionResult, Multiplier};
    use dailyrate_fx::conversion::bidirectional_rates;
    use dailyrate_common::RateTable;

    fn at() -> Timestamp {
        from_epoch_millis(1_714_521_600_000).unwrap()
    }

    #[test]
    fn test_render_board() {
        let table = RateTable::from_rates(CurrencyCode::Jpy, [(CurrencyCode::Usd, 0.0067)]).unwrap();
        let board = RateBoard {
            base: CurrencyCode::Jpy,
            fetched_at: at(),
            provenance: Provenance::Cached,
            rows: vec![bidirectional_rates(
                CurrencyCode::Jpy,
                CurrencyCode::Usd,
                &table,
                Multiplier::Hundred,
            )
            .unwrap()],
        };

        let text = render_board(&board);

        assert!(text.starts_with("Rates for JPY as of 2024-05-01T00:00:00Z (cached)\n"));
        assert!(text.contains("100 JPY = 0.6700 USD   100 USD = 14,925.37 JPY"));
    }

    #[test]
    fn test_render_conversion() {
        let conversion = Conversion {
            from: CurrencyCode::Jpy,
            to: CurrencyCode::Usd,
            amount: 1000.0,
            result: ConversionResult {
                result_amount: 6.7,
                effective_rate: 0.0067,
            },
            pivot: CurrencyCode::Jpy,
            rates_fetched_at: at(),
            provenance: Provenance::Fetched,
        };

        assert_eq!(
            render_conversion(&conversion),
            "¥1,000 = $6.70  (1 JPY = 0.006700 USD)"
        );
    }

    #[test]
    fn test_render_currencies_lists_all() {
        let text = render_currencies();
        assert_eq!(text.lines().count(), 9);
        assert!(text.contains("KRW  ₩    South Korean Won"));
    }

    #[test]
    fn test_render_failed_state_shows_code() {
        let mut state = ViewState::new(CurrencyCode::Gbp);
        state.phase = Phase::Failed {
            code: "HTTP_ERROR",
            message: "HTTP error: status 503".to_string(),
        };

        assert!(render_state(&state)
            .starts_with("Could not load GBP rates: HTTP error: status 503 [HTTP_ERROR]\n"));
    }

    #[test]
    fn test_render_idle_state() {
        let state = ViewState::new(CurrencyCode::Jpy);
        assert_eq!(render_state(&state), "Convert JPY -> USD: enter an amount\n");
    }
}
