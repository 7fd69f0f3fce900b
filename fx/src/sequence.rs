//! Request sequencing so late responses never overwrite newer ones.

use dailyrate_common::CurrencyCode;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Stamp carried by one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub base: CurrencyCode,
    pub seq: u64,
}

/// Issues monotonically increasing tickets and tracks the latest per base.
pub struct RequestSequencer {
    next: AtomicU64,
    latest: DashMap<CurrencyCode, u64>,
}

impl RequestSequencer {
    /// Create a sequencer with no tickets issued.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
            latest: DashMap::new(),
        }
    }

    /// Issue a ticket for a new request against `base`, superseding older ones.
    pub fn issue(&self, base: CurrencyCode) -> Ticket {
        let seq = self.next.fetch_add(1, Ordering::SeqCst);
        self.latest.insert(base, seq);
        debug!(base = %base, seq, "Issued request ticket");
        Ticket { base, seq }
    }

    /// Run `apply` only if `ticket` is still the latest for its base.
    ///
    /// No ticket for the same base can be issued while `apply` runs.
    pub fn commit_if_current<F: FnOnce()>(&self, ticket: &Ticket, apply: F) -> bool {
        match self.latest.get(&ticket.base) {
            Some(latest) if *latest == ticket.seq => {
                apply();
                true
            }
            _ => {
                debug!(base = %ticket.base, seq = ticket.seq, "Discarding superseded request");
                false
            }
        }
    }
}

impl Default for RequestSequencer {
    fn default() -> Self {
        Self::new()
    }
}
