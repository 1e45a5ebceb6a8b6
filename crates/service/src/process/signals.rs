use std::fmt;
use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;

/// How long SIGTERM waits before the server stops accepting connections
const SIGTERM_DRAIN_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    Interrupt,
    Terminate,
}

impl fmt::Display for Shutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shutdown::Interrupt => f.write_str("SIGINT"),
            Shutdown::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Handlers are installed before this returns, so a signal arriving
/// while the service is still starting is not lost.
pub fn install() -> std::io::Result<impl std::future::Future<Output = Shutdown>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => Shutdown::Interrupt,
            _ = terminate.recv() => Shutdown::Terminate,
        }
    })
}

/// Wait for `signal`, delay on SIGTERM, then notify every receiver of `drain`.
pub async fn forward(signal: impl std::future::Future<Output = Shutdown>, drain: watch::Sender<()>) {
    let received = signal.await;
    tracing::info!(signal = %received, "shutdown requested");

    if received == Shutdown::Terminate {
        tracing::debug!(
            delay_secs = SIGTERM_DRAIN_DELAY.as_secs(),
            "delaying shutdown so in-flight requests can finish"
        );
        tokio::time::sleep(SIGTERM_DRAIN_DELAY).await;
    }

    // receivers may already be gone if the server exited first
    drain.send_replace(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_interrupt_drains_immediately() {
        let (tx, mut rx) = watch::channel(());
        forward(async { Shutdown::Interrupt }, tx).await;
        // the sender is gone but the value sent before it dropped is still seen
        rx.changed().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminate_waits_before_draining() {
        let (tx, mut rx) = watch::channel(());
        let task = tokio::spawn(forward(async { Shutdown::Terminate }, tx));

        tokio::time::sleep(SIGTERM_DRAIN_DELAY / 2).await;
        assert!(!rx.has_changed().unwrap());

        rx.changed().await.unwrap();
        task.await.unwrap();
    }
}
