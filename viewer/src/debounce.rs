//! Trailing-edge debouncing.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

/// Delivers only the last of a burst of items, once input has been quiet for
/// the configured window.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Start a debouncer task that calls `fire` with each settled item.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(window: Duration, mut fire: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(mut pending) = rx.recv().await {
                loop {
                    match tokio::time::timeout(window, rx.recv()).await {
                        Ok(Some(next)) => {
                            debug!("Input superseded within debounce window");
                            pending = next;
                        }
                        Ok(None) => {
                            fire(pending);
                            return;
                        }
                        Err(_) => break,
                    }
                }
                fire(pending);
            }
        });

        Self { tx }
    }

    /// Submit an item, restarting the quiet window.
    pub fn push(&self, item: T) {
        if self.tx.send(item).is_err() {
            debug!("Debouncer task has stopped");
        }
    }
}
