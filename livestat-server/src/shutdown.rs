//! Signal handling for graceful shutdown.

use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::watch;

/// Creates a future that completes when a shutdown signal is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C). A handler that fails to
/// install is logged and never fires; the other one still works.
pub async fn shutdown_signal() {
    tokio::select! {
        _ = wait_for(SignalKind::terminate(), "SIGTERM") => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = wait_for(SignalKind::interrupt(), "SIGINT") => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}

async fn wait_for(kind: SignalKind, name: &'static str) {
    match signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::error!(signal = name, error = %e, "Failed to install signal handler");
            std::future::pending::<()>().await;
        }
    }
}

/// Resolves once `true` is published on the shutdown channel, or the
/// sender is dropped.
pub async fn shutdown_requested(mut shutdown_rx: watch::Receiver<bool>) {
    let _ = shutdown_rx.wait_for(|stop| *stop).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_requested_resolves_on_true() {
        let (tx, rx) = watch::channel(false);
        let waiter = tokio::spawn(shutdown_requested(rx));

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_requested_resolves_when_sender_dropped() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        tokio::time::timeout(Duration::from_secs(5), shutdown_requested(rx))
            .await
            .unwrap();
    }
}
