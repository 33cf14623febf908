//! EventIntake processor.
//!
//! The EventIntake is responsible for:
//! - Attaching to the live feed for one session
//! - Receiving `FeedEvent`s strictly in delivery order
//! - Reducing each event to a `Delta` and applying it to the `SnapshotStore`
//! - Skipping malformed events without dropping the connection
//! - Reconnecting with exponential backoff when the feed drops
//!
//! It is the only writer of the aggregate state. Events are never processed
//! concurrently: a later delta must not overtake an earlier one.

use crate::config::IntakeConfig;
use crate::events::FeedEvent;
use crate::feed::{FeedError, FeedStream, LiveFeed};
use crate::lifecycle::Lifecycle;
use crate::reducer::reduce;
use crate::store::{Change, Delta, SnapshotStore};
use crate::utils::backoff::ReconnectPolicy;
use futures_util::StreamExt;
use kanau::processor::Processor;
use std::convert::Infallible;
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Consecutive reconnect failures between `error`-level reports.
const REPORT_EVERY: u32 = 10;

/// Errors that end the intake loop.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The very first connection attempt failed.
    #[error("failed to attach to session {session}: {source}")]
    Startup {
        session: String,
        #[source]
        source: FeedError,
    },
}

/// EventIntake feeds live events into the snapshot store.
pub struct EventIntake {
    store: SnapshotStore,
    feed: Arc<dyn LiveFeed>,
    session_id: String,
    lifecycle: Lifecycle,
    reconnect: ReconnectPolicy,
}

impl EventIntake {
    /// Create a new EventIntake.
    ///
    /// # Arguments
    ///
    /// * `store` - The write handle; the intake becomes its only owner
    /// * `feed` - Connector for the live feed
    /// * `config` - Session id and reconnect policy
    /// * `lifecycle` - Moved to `Running` once the feed attaches
    pub fn new(
        store: SnapshotStore,
        feed: Arc<dyn LiveFeed>,
        config: &IntakeConfig,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            store,
            feed,
            session_id: config.session_id.clone(),
            lifecycle,
            reconnect: config.reconnect,
        }
    }

    /// Run the EventIntake until shutdown is signaled.
    ///
    /// Returns an error only if the initial connection fails. Once attached,
    /// every feed fault is handled here and the loop keeps going until
    /// `shutdown_rx` turns `true`.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), IntakeError> {
        info!(session = %self.session_id, "EventIntake started");

        let attached = tokio::select! {
            biased;

            _ = shutdown_requested(&mut shutdown_rx) => {
                info!("EventIntake received shutdown signal before attaching");
                return Ok(());
            }

            result = self.feed.connect(&self.session_id) => result,
        };

        let mut stream = match attached {
            Ok(stream) => stream,
            Err(source) => {
                error!(
                    session = %self.session_id,
                    error = %source,
                    "Failed to attach to live feed"
                );
                return Err(IntakeError::Startup {
                    session: self.session_id,
                    source,
                });
            }
        };

        self.lifecycle.mark_running();
        info!(session = %self.session_id, "Attached to live feed");

        loop {
            tokio::select! {
                biased;

                // Shutdown has highest priority.
                _ = shutdown_requested(&mut shutdown_rx) => {
                    info!("EventIntake received shutdown signal");
                    break;
                }

                next = stream.next() => {
                    let lost = match next {
                        Some(Ok(event)) => {
                            let _ = self.process(event).await;
                            continue;
                        }
                        Some(Err(e)) if e.is_event_scoped() => {
                            warn!(error = %e, "Skipping malformed feed event");
                            continue;
                        }
                        Some(Err(e)) => e.to_string(),
                        None => "stream ended".to_string(),
                    };

                    warn!(session = %self.session_id, reason = %lost, "Live feed lost, reconnecting");
                    self.store
                        .apply(Delta::new(OffsetDateTime::now_utc(), Change::SessionEnded))
                        .await;
                    match self.reconnect(&mut shutdown_rx).await {
                        Some(reconnected) => stream = reconnected,
                        None => break,
                    }
                }
            }
        }

        // Release the upstream connection before reporting completion.
        drop(stream);
        info!("EventIntake shutdown complete");
        Ok(())
    }

    /// Retry the feed until it attaches or shutdown is requested.
    ///
    /// Returns `None` on shutdown.
    async fn reconnect(&self, shutdown_rx: &mut watch::Receiver<bool>) -> Option<FeedStream> {
        let mut attempt: u32 = 0;

        loop {
            let delay = self.reconnect.delay(attempt);
            tokio::select! {
                biased;
                _ = shutdown_requested(shutdown_rx) => return None,
                _ = tokio::time::sleep(delay) => {}
            }

            let result = tokio::select! {
                biased;
                _ = shutdown_requested(shutdown_rx) => return None,
                result = self.feed.connect(&self.session_id) => result,
            };

            match result {
                Ok(stream) => {
                    info!(session = %self.session_id, attempt, "Live feed reconnected");
                    return Some(stream);
                }
                Err(e) => {
                    attempt = attempt.saturating_add(1);
                    if attempt % REPORT_EVERY == 0 {
                        error!(
                            session = %self.session_id,
                            attempt,
                            error = %e,
                            "Live feed still unreachable"
                        );
                    } else {
                        warn!(
                            session = %self.session_id,
                            attempt,
                            error = %e,
                            next_delay = ?self.reconnect.delay(attempt),
                            "Reconnect attempt failed"
                        );
                    }
                }
            }
        }
    }
}

/// Resolves once shutdown is requested or the shutdown sender is gone.
async fn shutdown_requested(shutdown_rx: &mut watch::Receiver<bool>) {
    let _ = shutdown_rx.wait_for(|stop| *stop).await;
}

// ---------------------------------------------------------------------------
// Processor trait implementation
// ---------------------------------------------------------------------------

impl Processor<FeedEvent> for EventIntake {
    type Output = ();
    type Error = Infallible;

    async fn process(&self, event: FeedEvent) -> Result<(), Infallible> {
        let kind = event.kind();
        let delta = reduce(event, OffsetDateTime::now_utc());

        if delta.is_noop() {
            debug!(kind, "Ignoring unsupported feed event");
            return Ok(());
        }

        self.store.apply(delta).await;
        debug!(kind, "Applied feed event");
        Ok(())
    }
}
