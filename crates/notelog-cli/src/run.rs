//! Control loop: forwards subscribed messages to the writer until shutdown.

use std::future::Future;
use std::io;

use anyhow::Context;
use notelog_core::{LogError, SerializedWriter};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bootstrap::{CliConfig, bootstrap};
use crate::error::CliError;
use crate::parser::Cli;
use crate::source::stdin_source;

/// Why the control loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Interrupt signal received.
    Interrupted,
    /// The event source has no more messages.
    SourceClosed,
}

/// Outcome of a clean run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub forwarded: u64,
    pub reason: StopReason,
}

/// Forward each message verbatim to `writer` until `shutdown` resolves or
/// the source closes.
///
/// A write in progress always completes; shutdown is observed between
/// messages. The first write error ends the loop and is returned.
pub async fn control_loop<S>(
    writer: &SerializedWriter,
    messages: &mut UnboundedReceiver<String>,
    shutdown: S,
) -> Result<RunSummary, LogError>
where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut forwarded = 0;

    let reason = loop {
        tokio::select! {
            biased;
            () = &mut shutdown => break StopReason::Interrupted,
            next = messages.recv() => match next {
                Some(message) => {
                    println!("{message}");
                    writer.write(&message).await?;
                    forwarded += 1;
                }
                None => break StopReason::SourceClosed,
            },
        }
    };

    info!(forwarded, ?reason, "Control loop stopped");
    Ok(RunSummary { forwarded, reason })
}

/// Resolves on the first Ctrl+C.
pub async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl+C, relying on end of input");
        std::future::pending::<()>().await;
    }
}

/// Run the CLI: bootstrap the writer, subscribe to stdin, forward messages.
///
/// The writer is disposed on the way out whether or not the loop failed.
pub async fn execute(cli: Cli) -> anyhow::Result<RunSummary> {
    let config = CliConfig::from_cli(cli)?;
    let destination = config.destination.clone();
    let writer = bootstrap(config)
        .with_context(|| format!("cannot prepare log file {}", destination.display()))?;

    let (mut messages, source) = stdin_source().subscribe();
    let outcome = control_loop(&writer, &mut messages, interrupt_signal()).await;
    writer.dispose().await;

    let summary = outcome.map_err(CliError::from)?;
    if summary.reason == StopReason::SourceClosed {
        source_finished(source).await?;
    }
    Ok(summary)
}

/// Surface a read failure that closed the event source early.
async fn source_finished(source: JoinHandle<io::Result<u64>>) -> Result<(), CliError> {
    match source.await {
        Ok(Ok(delivered)) => {
            debug!(delivered, "Event source drained");
            Ok(())
        }
        Ok(Err(e)) => Err(CliError::Io(e)),
        Err(e) => Err(CliError::Io(io::Error::other(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notelog_core::{EditorSession, SessionFactory};
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    /// Counts sessions; fails when asked to write "boom".
    #[derive(Default)]
    struct CountingFactory {
        writes: Arc<AtomicU64>,
    }

    struct CountingSession {
        writes: Arc<AtomicU64>,
    }

    #[async_trait::async_trait]
    impl SessionFactory for CountingFactory {
        async fn open(&self, _destination: &Path) -> Result<Box<dyn EditorSession>, LogError> {
            Ok(Box::new(CountingSession {
                writes: self.writes.clone(),
            }))
        }
    }

    #[async_trait::async_trait]
    impl EditorSession for CountingSession {
        async fn write(&mut self, message: &str) -> Result<(), LogError> {
            if message == "boom" {
                return Err(LogError::Input("boom".to_string()));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn close(&mut self) -> Result<(), LogError> {
            Ok(())
        }
    }

    fn writer_in(dir: &TempDir) -> (SerializedWriter, Arc<AtomicU64>) {
        let factory = CountingFactory::default();
        let writes = factory.writes.clone();
        let writer = SerializedWriter::open(dir.path().join("log.txt"), Arc::new(factory)).unwrap();
        (writer, writes)
    }

    #[tokio::test]
    async fn test_forwards_until_source_closes() {
        let dir = TempDir::new().unwrap();
        let (writer, writes) = writer_in(&dir);
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send("one".to_string()).unwrap();
        tx.send("two".to_string()).unwrap();
        drop(tx);

        let summary = control_loop(&writer, &mut rx, std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.forwarded, 2);
        assert_eq!(summary.reason, StopReason::SourceClosed);
        assert_eq!(writes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let dir = TempDir::new().unwrap();
        let (writer, writes) = writer_in(&dir);
        let (_tx, mut rx) = mpsc::unbounded_channel::<String>();

        let summary = control_loop(&writer, &mut rx, async {}).await.unwrap();

        assert_eq!(summary.reason, StopReason::Interrupted);
        assert_eq!(writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_write_error_terminates_loop() {
        let dir = TempDir::new().unwrap();
        let (writer, writes) = writer_in(&dir);
        let (tx, mut rx) = mpsc::unbounded_channel();
        for message in ["ok", "boom", "never"] {
            tx.send(message.to_string()).unwrap();
        }

        let err = control_loop(&writer, &mut rx, std::future::pending())
            .await
            .unwrap_err();

        assert!(matches!(err, LogError::Input(_)));
        assert_eq!(writes.load(Ordering::SeqCst), 1);
        // The message after the failure was never taken
        assert_eq!(rx.recv().await.as_deref(), Some("never"));
    }

    #[tokio::test]
    async fn test_source_read_failure_is_io_error() {
        let failed = tokio::spawn(async {
            Err::<u64, _>(io::Error::new(io::ErrorKind::BrokenPipe, "console gone"))
        });
        let err = source_finished(failed).await.unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(err.exit_code(), 74);

        let drained = tokio::spawn(async { Ok::<u64, io::Error>(3) });
        source_finished(drained).await.unwrap();
    }

    #[tokio::test]
    async fn test_disposed_writer_fails_first_message() {
        let dir = TempDir::new().unwrap();
        let (writer, _writes) = writer_in(&dir);
        writer.dispose().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send("late".to_string()).unwrap();

        let err = control_loop(&writer, &mut rx, std::future::pending())
            .await
            .unwrap_err();
        assert!(matches!(err, LogError::Disposed));
    }
}
