//! View controller: runs reducer effects against the rate service.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info};

use dailyrate_common::now;
use dailyrate_fx::{Action, Effect, RateService, ViewState};

use crate::debounce::Debouncer;

/// Owns the view state and turns effects into service calls.
///
/// Completed effects come back as actions on the receiver returned by
/// [`ViewController::new`]; feed them to [`ViewController::dispatch`].
pub struct ViewController {
    service: Arc<RateService>,
    state: Arc<RwLock<ViewState>>,
    completions: mpsc::UnboundedSender<Action>,
    conversions: Debouncer<Effect>,
}

impl ViewController {
    /// Create a controller. Must be called from within a Tokio runtime.
    pub fn new(
        service: Arc<RateService>,
        initial: ViewState,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (completions, rx) = mpsc::unbounded_channel();

        let conversions = {
            let service = service.clone();
            let completions = completions.clone();
            Debouncer::spawn(debounce, move |effect| {
                run_effect(service.clone(), completions.clone(), effect);
            })
        };

        let controller = Self {
            service,
            state: Arc::new(RwLock::new(initial)),
            completions,
            conversions,
        };

        (controller, rx)
    }

    /// Apply `action` and start whatever work it requires.
    pub fn dispatch(&self, action: Action) {
        let effect = self.state.write().dispatch(action);

        match effect {
            Some(effect @ Effect::FetchRates { .. }) => {
                run_effect(self.service.clone(), self.completions.clone(), effect);
            }
            Some(effect @ Effect::Convert { .. }) => self.conversions.push(effect),
            None => {}
        }
    }

    /// Copy of the current view state.
    pub fn state(&self) -> ViewState {
        self.state.read().clone()
    }
}

fn run_effect(service: Arc<RateService>, completions: mpsc::UnboundedSender<Action>, effect: Effect) {
    tokio::spawn(async move {
        let action = match effect {
            Effect::FetchRates { seq, base } => {
                info!(base = %base, seq, "Loading rates");
                match service.get_rates(base, now()).await {
                    Ok(snapshot) => Action::RatesLoaded { seq, snapshot },
                    Err(error) => Action::RatesFailed { seq, error },
                }
            }
            Effect::Convert {
                seq,
                from,
                to,
                amount,
            } => match service.convert(from, to, amount, now()).await {
                Ok(conversion) => Action::ConversionDone { seq, conversion },
                Err(error) => Action::ConversionFailed { seq, error },
            },
        };

        if completions.send(action).is_err() {
            debug!("View closed before effect completed");
        }
    });
}
