// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the bot loop monitors. In-flight turns are
//! drained before the process exits.

use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                        _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Waits up to `timeout` for the loop's tasks, aborting whatever is left.
pub async fn drain_turns(tasks: &mut JoinSet<()>, timeout: Duration) {
    if tasks.is_empty() {
        info!("no in-flight turns to drain");
        return;
    }

    info!(count = tasks.len(), "waiting for in-flight turns to complete");

    let drained = tokio::time::timeout(timeout, async {
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "turn task failed");
            }
        }
    })
    .await;

    match drained {
        Ok(()) => info!("all turns drained successfully"),
        Err(_) => {
            warn!(remaining = tasks.len(), "timeout reached, aborting remaining turns");
            tasks.abort_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn install_signal_handler_returns_token() {
        let token = install_signal_handler();
        assert!(!token.is_cancelled());
        token.cancel();
    }

    #[tokio::test]
    async fn drain_empty_set_returns_immediately() {
        let mut tasks = JoinSet::new();
        drain_turns(&mut tasks, Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn drain_waits_for_quick_turns() {
        let mut tasks = JoinSet::new();
        tasks.spawn(async {
            tokio::time::sleep(Duration::from_millis(5)).await;
        });
        drain_turns(&mut tasks, Duration::from_secs(1)).await;
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn drain_aborts_stuck_turns() {
        let mut tasks = JoinSet::new();
        tasks.spawn(std::future::pending::<()>());
        drain_turns(&mut tasks, Duration::from_millis(10)).await;
        // Aborted tasks are reaped on the next join.
        let joined = tasks.join_next().await.unwrap();
        assert!(joined.unwrap_err().is_cancelled());
    }
}
