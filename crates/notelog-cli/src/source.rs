//! Event source collaborator.
//!
//! Messages are pushed by subscription: a background task reads lines and
//! sends each non-empty one into a channel. The source never waits on the
//! writer, so a fast producer simply accumulates messages in the channel.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::debug;

/// Line-oriented message source over any async reader.
pub struct LineEventSource<R> {
    reader: R,
}

impl<R> LineEventSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Start delivering messages.
    ///
    /// The returned task resolves to the number of messages delivered once
    /// the input ends or the receiver is dropped, or to the read error that
    /// ended the input early.
    pub fn subscribe(self) -> (UnboundedReceiver<String>, JoinHandle<io::Result<u64>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            let mut lines = BufReader::new(self.reader).lines();
            let mut delivered: u64 = 0;
            while let Some(line) = lines.next_line().await? {
                if line.is_empty() {
                    continue;
                }
                if tx.send(line).is_err() {
                    debug!("Subscriber gone, stopping event source");
                    break;
                }
                delivered += 1;
            }
            Ok::<_, io::Error>(delivered)
        });
        (rx, handle)
    }
}

/// Messages from standard input, one per line.
pub fn stdin_source() -> LineEventSource<tokio::io::Stdin> {
    LineEventSource::new(tokio::io::stdin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncWriteExt, ReadBuf};

    struct BrokenPipe;

    impl AsyncRead for BrokenPipe {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "console gone")))
        }
    }

    #[tokio::test]
    async fn test_lines_are_pushed_verbatim() {
        let input: &[u8] = b"first message\r\n\n   \nsecond  message \n";
        let (mut rx, handle) = LineEventSource::new(input).subscribe();

        assert_eq!(rx.recv().await.as_deref(), Some("first message"));
        assert_eq!(rx.recv().await.as_deref(), Some("   "));
        assert_eq!(rx.recv().await.as_deref(), Some("second  message "));
        assert_eq!(rx.recv().await, None);
        assert_eq!(handle.await.unwrap().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_read_failure_is_reported() {
        let (mut rx, handle) = LineEventSource::new(BrokenPipe).subscribe();

        assert_eq!(rx.recv().await, None);
        let err = handle.await.unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn test_dropping_receiver_stops_source() {
        let (mut client, server) = tokio::io::duplex(64);
        let (rx, handle) = LineEventSource::new(server).subscribe();
        drop(rx);

        client.write_all(b"orphan\n").await.unwrap();

        assert_eq!(handle.await.unwrap().unwrap(), 0);
    }
}
