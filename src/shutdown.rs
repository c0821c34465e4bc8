//! Stop requests from the operating system.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::output::print_warning;

/// Cancel `token` on the first Ctrl-C (or SIGTERM/SIGHUP on unix).
///
/// Posts already in progress finish; nothing new is started afterwards.
pub fn spawn_signal_listener(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            received = shutdown_signal() => match received {
                Ok(()) => {
                    print_warning("Stop requested, finishing posts in progress...");
                    token.cancel();
                }
                Err(e) => tracing::error!("Failed to install signal handlers: {}", e),
            },
            _ = token.cancelled() => {}
        }
    })
}

async fn shutdown_signal() -> Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = signal(SignalKind::terminate())?;
        let mut hup = signal(SignalKind::hangup())?;
        tokio::select! {
            received = &mut ctrl_c => received?,
            _ = term.recv() => {},
            _ = hup.recv() => {},
        }
        return Ok(());
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listener_exits_when_token_cancelled_elsewhere() {
        let token = CancellationToken::new();
        let listener = spawn_signal_listener(token.clone());

        token.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(1), listener)
            .await
            .unwrap()
            .unwrap();
    }
}
