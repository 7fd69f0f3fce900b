//! Rate tables.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::currency::CurrencyCode;
use crate::error::RateTableError;

/// Rates quoted against a single base currency.
///
/// Each entry means "1 unit of `base` = rate units of this currency". The base
/// itself is implicitly 1.0 and is never stored as a key. All stored rates are
/// finite and strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRateTable")]
pub struct RateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, f64>,
}

/// Unvalidated wire form; deserialization goes through [`RateTable::from_rates`].
#[derive(Deserialize)]
struct RawRateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, f64>,
}

impl TryFrom<RawRateTable> for RateTable {
    type Error = RateTableError;

    fn try_from(raw: RawRateTable) -> Result<Self, Self::Error> {
        RateTable::from_rates(raw.base, raw.rates)
    }
}

impl RateTable {
    /// Create an empty table for `base`.
    pub fn new(base: CurrencyCode) -> Self {
        Self {
            base,
            rates: BTreeMap::new(),
        }
    }

    /// Build a table from `(code, rate)` pairs.
    ///
    /// A pair for the base currency is dropped. Any non-positive or
    /// non-finite rate rejects the whole table.
    pub fn from_rates<I>(base: CurrencyCode, rates: I) -> Result<Self, RateTableError>
    where
        I: IntoIterator<Item = (CurrencyCode, f64)>,
    {
        let mut table = Self::new(base);
        for (code, rate) in rates {
            table.insert(code, rate)?;
        }
        Ok(table)
    }

    /// Build a table from the feed's nested rate object.
    ///
    /// Keys outside the supported set are ignored, matched case-insensitively.
    pub fn from_json_object(base: CurrencyCode, value: &Value) -> Result<Self, RateTableError> {
        let object = value.as_object().ok_or(RateTableError::NotAnObject)?;

        let mut table = Self::new(base);
        for (key, raw) in object {
            let Ok(code) = CurrencyCode::from_str(key) else {
                continue;
            };
            let rate = raw.as_f64().ok_or(RateTableError::NonNumeric(code))?;
            table.insert(code, rate)?;
        }
        Ok(table)
    }

    fn insert(&mut self, code: CurrencyCode, rate: f64) -> Result<(), RateTableError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(RateTableError::InvalidRate { code, rate });
        }
        if code != self.base {
            self.rates.insert(code, rate);
        }
        Ok(())
    }

    /// The currency this table is quoted against.
    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    /// Rate for `code`, if present. The base is not a key and returns `None`.
    pub fn get(&self, code: CurrencyCode) -> Option<f64> {
        self.rates.get(&code).copied()
    }

    /// Iterate rates in code order.
    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, f64)> + '_ {
        self.rates.iter().map(|(code, rate)| (*code, *rate))
    }

    /// Number of stored rates, not counting the base.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check whether the table holds no rates.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
