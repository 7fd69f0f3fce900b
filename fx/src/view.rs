//! Application view state driven by reducer actions.
//!
//! The reducer is pure: it takes the current state and an action and returns
//! the next state plus, at most, one effect for the caller to run. Effects
//! carry a sequence number; completions that come back with an older number
//! than the latest request are discarded, so a slow response can never
//! overwrite a newer selection.

use dailyrate_common::CurrencyCode;
use serde::Serialize;

use crate::conversion::{self, BidirectionalRate};
use crate::error::FxError;
use crate::format::Multiplier;
use crate::service::{Conversion, Provenance, RateSnapshot};

/// Rate board loading phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", content = "error", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    /// Loading failed with nothing cached to fall back on.
    Failed {
        /// Stable code from [`FxError::error_code`].
        code: &'static str,
        message: String,
    },
}

/// Something that happened: user input or an effect completing.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show rates for a different base currency.
    SelectBase(CurrencyCode),
    /// Change the display multiplier; `None` picks one per row.
    SetMultiplier(Option<Multiplier>),
    /// Raw amount input changed.
    SetAmount(String),
    /// Conversion pair changed.
    SetPair { from: CurrencyCode, to: CurrencyCode },
    /// Swap the conversion pair.
    SwapPair,
    RatesLoaded { seq: u64, snapshot: RateSnapshot },
    RatesFailed { seq: u64, error: FxError },
    ConversionDone { seq: u64, conversion: Conversion },
    ConversionFailed { seq: u64, error: FxError },
}

/// Work the caller must perform, then report back with an [`Action`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    FetchRates {
        seq: u64,
        base: CurrencyCode,
    },
    Convert {
        seq: u64,
        from: CurrencyCode,
        to: CurrencyCode,
        amount: f64,
    },
}

impl Effect {
    /// Sequence number stamped on this effect.
    pub fn seq(&self) -> u64 {
        match self {
            Effect::FetchRates { seq, .. } | Effect::Convert { seq, .. } => *seq,
        }
    }
}

/// Everything the display needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub base: CurrencyCode,
    pub multiplier: Option<Multiplier>,
    pub phase: Phase,
    pub rates: Option<RateSnapshot>,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount_input: String,
    pub conversion: Option<Conversion>,
    pub conversion_error: Option<String>,
    next_seq: u64,
    rates_seq: u64,
    conversion_seq: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(CurrencyCode::Jpy)
    }
}

impl ViewState {
    /// Initial state showing `base`, converting from `base` to USD.
    pub fn new(base: CurrencyCode) -> Self {
        let to = if base == CurrencyCode::Usd {
            CurrencyCode::Jpy
        } else {
            CurrencyCode::Usd
        };
        Self {
            base,
            multiplier: None,
            phase: Phase::Idle,
            rates: None,
            from: base,
            to,
            amount_input: String::new(),
            conversion: None,
            conversion_error: None,
            next_seq: 1,
            rates_seq: 0,
            conversion_seq: 0,
        }
    }

    /// Apply `action` in place and return the resulting effect.
    pub fn dispatch(&mut self, action: Action) -> Option<Effect> {
        let (next, effect) = reduce(std::mem::take(self), action);
        *self = next;
        effect
    }

    /// Rate board rows for the current snapshot and multiplier.
    pub fn rows(&self) -> Vec<BidirectionalRate> {
        self.rates
            .as_ref()
            .map(|snapshot| conversion::rate_rows(&snapshot.table, self.multiplier))
            .unwrap_or_default()
    }

    /// Label shown next to the rate board when data did not come fresh from the feed.
    ///
    /// Any cache hit shows "(cached)"; a fallback after a failed fetch adds
    /// that the data is stale.
    pub fn cache_indicator(&self) -> Option<&'static str> {
        match self.rates.as_ref().map(|s| s.provenance) {
            Some(Provenance::Cached) => Some("(cached)"),
            Some(Provenance::StaleFallback) => Some("(cached, stale)"),
            _ => None,
        }
    }

    fn stamp(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn request_conversion(&mut self) -> Option<Effect> {
        match conversion::parse_amount(&self.amount_input) {
            Ok(amount) => {
                let seq = self.stamp();
                self.conversion_seq = seq;
                self.conversion_error = None;
                Some(Effect::Convert {
                    seq,
                    from: self.from,
                    to: self.to,
                    amount,
                })
            }
            Err(e) => {
                // supersede anything in flight
                self.conversion_seq = self.stamp();
                self.conversion = None;
                self.conversion_error = if self.amount_input.trim().is_empty() {
                    None
                } else {
                    Some(e.to_string())
                };
                None
            }
        }
    }
}

/// Compute the next state for `action`.
pub fn reduce(mut state: ViewState, action: Action) -> (ViewState, Option<Effect>) {
    let effect = match action {
        Action::SelectBase(base) => {
            let seq = state.stamp();
            state.base = base;
            state.rates_seq = seq;
            state.phase = Phase::Loading;
            Some(Effect::FetchRates { seq, base })
        }
        Action::SetMultiplier(multiplier) => {
            state.multiplier = multiplier;
            None
        }
        Action::SetAmount(input) => {
            state.amount_input = input;
            state.request_conversion()
        }
        Action::SetPair { from, to } => {
            state.from = from;
            state.to = to;
            state.request_conversion()
        }
        Action::SwapPair => {
            std::mem::swap(&mut state.from, &mut state.to);
            state.request_conversion()
        }
        Action::RatesLoaded { seq, snapshot } => {
            if seq == state.rates_seq && snapshot.base == state.base {
                state.rates = Some(snapshot);
                state.phase = Phase::Ready;
            }
            None
        }
        Action::RatesFailed { seq, error } => {
            if seq == state.rates_seq {
                state.rates = None;
                state.phase = Phase::Failed {
                    code: error.error_code(),
                    message: error.to_string(),
                };
            }
            None
        }
        Action::ConversionDone { seq, conversion } => {
            if seq == state.conversion_seq {
                state.conversion = Some(conversion);
                state.conversion_error = None;
            }
            None
        }
        Action::ConversionFailed { seq, error } => {
            if seq == state.conversion_seq {
                state.conversion = None;
                state.conversion_error = Some(error.to_string());
            }
            None
        }
    };

    (state, effect)
}
