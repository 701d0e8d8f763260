//! Process signals that stop `cdb serve`.

use std::fmt;
use std::future::pending;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use super::TRACING_TARGET_SHUTDOWN;

/// Signal that asked the server to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        })
    }
}

/// Resolves with the first of Ctrl+C or SIGTERM.
///
/// A signal whose handler cannot be installed is never reported.
pub async fn shutdown_signal() -> StopSignal {
    let signal = tokio::select! {
        () = interrupt() => StopSignal::Interrupt,
        () = terminate() => StopSignal::Terminate,
    };

    tracing::info!(target: TRACING_TARGET_SHUTDOWN, %signal, "Stopping the catalog server");
    signal
}

async fn interrupt() {
    if let Err(error) = ctrl_c().await {
        tracing::warn!(target: TRACING_TARGET_SHUTDOWN, %error, "Cannot watch for Ctrl+C");
        pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(error) => {
            tracing::warn!(target: TRACING_TARGET_SHUTDOWN, %error, "Cannot watch for SIGTERM");
            pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_print_their_unix_names() {
        assert_eq!(StopSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(StopSignal::Terminate.to_string(), "SIGTERM");
    }
}
