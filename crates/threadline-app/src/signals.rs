//! OS signal handling
//!
//! A termination signal becomes [`Message::Quit`]. The runner then lets
//! requests in flight settle before the engine shuts down, so a comment
//! submitted just before Ctrl+C is still reported.

use std::fmt;

use threadline_core::prelude::*;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::message::Message;

/// Which signal asked the thread to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopSignal::Interrupt => write!(f, "interrupt"),
            StopSignal::Terminate => write!(f, "terminate"),
        }
    }
}

/// Listen for termination signals until the engine's channel closes.
///
/// The returned handle is aborted by [`crate::Engine::shutdown`].
pub fn spawn_signal_handler(tx: mpsc::Sender<Message>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let signal = tokio::select! {
            signal = wait_for_signal() => signal,
            _ = tx.closed() => {
                debug!("Engine gone; signal handler exiting");
                return;
            }
        };

        match signal {
            Ok(signal) => {
                info!("Received {} signal, settling requests before exit", signal);
                if tx.send(Message::Quit).await.is_err() {
                    debug!("Engine gone before quit could be delivered");
                }
            }
            Err(e) => error!("Signal handler error: {}", e),
        }
    })
}

async fn wait_for_signal() -> Result<StopSignal> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| Error::signal(format!("SIGINT handler: {}", e)))?;
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| Error::signal(format!("SIGTERM handler: {}", e)))?;

        let signal = tokio::select! {
            _ = sigint.recv() => StopSignal::Interrupt,
            _ = sigterm.recv() => StopSignal::Terminate,
        };
        Ok(signal)
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| Error::signal(format!("Ctrl+C handler: {}", e)))?;
        Ok(StopSignal::Interrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_handler_stays_quiet_without_signal() {
        let (tx, mut rx) = mpsc::channel::<Message>(1);
        let handle = spawn_signal_handler(tx);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(rx.try_recv().is_err());
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn test_handler_exits_when_engine_channel_closes() {
        let (tx, rx) = mpsc::channel::<Message>(1);
        let handle = spawn_signal_handler(tx);

        drop(rx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("handler still running")
            .expect("handler panicked");
    }

    #[test]
    fn test_stop_signal_names() {
        assert_eq!(StopSignal::Interrupt.to_string(), "interrupt");
        assert_eq!(StopSignal::Terminate.to_string(), "terminate");
    }
}
