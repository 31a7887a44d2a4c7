//! Module `sink`
//!
//! The byte sink bound to one in-flight upload. Chunks accumulate in
//! memory; on normal completion the full payload is handed to the publisher
//! exactly once. An error, a client abort, an oversized payload, or a drop
//! before completion discards the buffer instead - a discarded transfer
//! never produces a message.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::BytesMut;
use log::{debug, warn};
use tokio::io::AsyncWrite;

use super::bus::PublishedMessage;
use super::publisher::Publisher;
use crate::error::TransferError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    Open,
    Sealed,
    Discarded,
}

pub struct UploadSink {
    destination: String,
    buf: BytesMut,
    limit: u64,
    state: SinkState,
    publisher: Arc<Publisher>,
}

impl UploadSink {
    pub(crate) fn new(destination: String, limit: u64, publisher: Arc<Publisher>) -> Self {
        Self {
            destination,
            buf: BytesMut::new(),
            limit,
            state: SinkState::Open,
            publisher,
        }
    }

    /// Destination path the payload will be published under.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Bytes buffered so far.
    pub fn received(&self) -> u64 {
        self.buf.len() as u64
    }

    /// Appends one chunk of upload data. Exceeding the size cap discards
    /// the whole transfer.
    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), TransferError> {
        if self.state != SinkState::Open {
            return Err(TransferError::SinkClosed);
        }

        let size = self.buf.len() as u64 + chunk.len() as u64;
        if size > self.limit {
            self.discard("size limit exceeded");
            return Err(TransferError::PayloadTooLarge {
                size,
                limit: self.limit,
            });
        }

        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    /// Seals the sink and hands the payload to the publisher. The protocol
    /// acknowledgment does not wait for delivery. Must run inside the tokio
    /// runtime.
    pub fn complete(mut self) {
        self.seal();
    }

    /// Drops the buffered payload; nothing is published.
    pub fn abort(mut self) {
        self.discard("client abort");
    }

    fn seal(&mut self) {
        if self.state != SinkState::Open {
            return;
        }
        self.state = SinkState::Sealed;

        debug!(
            "Upload complete: {} ({} bytes)",
            self.destination,
            self.buf.len()
        );
        let message = PublishedMessage::encode(&self.destination, &self.buf);
        self.buf.clear();
        self.publisher.dispatch(message);
    }

    fn discard(&mut self, reason: &str) {
        if self.state != SinkState::Open {
            return;
        }
        self.state = SinkState::Discarded;

        warn!(
            "Upload discarded: {} ({} bytes buffered): {}",
            self.destination,
            self.buf.len(),
            reason
        );
        self.buf.clear();
    }
}

/// A sink dropped mid-transfer counts as an abnormal close.
impl Drop for UploadSink {
    fn drop(&mut self) {
        if self.state == SinkState::Open {
            self.discard("connection closed before completion");
        }
    }
}

/// The protocol engine streams upload bytes through the standard write
/// interface; `shutdown` is the normal-completion event.
impl AsyncWrite for UploadSink {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let n = buf.len();
        match self.get_mut().write_chunk(buf) {
            Ok(()) => Poll::Ready(Ok(n)),
            Err(e) => Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, e))),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.get_mut().seal();
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::MemoryBus;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    fn sink_with_bus(limit: u64) -> (UploadSink, Arc<MemoryBus>) {
        let bus = Arc::new(MemoryBus::new());
        let publisher = Arc::new(Publisher::new(bus.clone()));
        (UploadSink::new("/srv/ftp/file.bin".into(), limit, publisher), bus)
    }

    async fn wait_for_messages(bus: &MemoryBus, want: usize) -> Vec<PublishedMessage> {
        for _ in 0..200 {
            let messages = bus.messages();
            if messages.len() >= want {
                return messages;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("bus never saw {} message(s)", want);
    }

    #[tokio::test]
    async fn completion_publishes_exactly_once() {
        let (mut sink, bus) = sink_with_bus(1024);
        sink.write_chunk(b"hello ").unwrap();
        sink.write_chunk(b"kafka").unwrap();
        sink.complete();

        let messages = wait_for_messages(&bus, 1).await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], PublishedMessage::encode("/srv/ftp/file.bin", b"hello kafka"));
    }

    #[tokio::test]
    async fn abort_publishes_nothing() {
        let (mut sink, bus) = sink_with_bus(1024);
        sink.write_chunk(b"partial").unwrap();
        sink.abort();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(bus.messages().is_empty());
    }

    #[tokio::test]
    async fn drop_without_completion_publishes_nothing() {
        let (mut sink, bus) = sink_with_bus(1024);
        sink.write_chunk(b"partial").unwrap();
        drop(sink);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(bus.messages().is_empty());
    }

    #[tokio::test]
    async fn oversized_upload_is_discarded() {
        let (mut sink, bus) = sink_with_bus(8);
        sink.write_chunk(b"12345").unwrap();
        let err = sink.write_chunk(b"67890").unwrap_err();
        assert!(matches!(err, TransferError::PayloadTooLarge { size: 10, limit: 8 }));

        // Sealing after the failure must not resurrect the transfer.
        sink.complete();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(bus.messages().is_empty());
    }

    #[tokio::test]
    async fn async_write_shutdown_is_normal_completion() {
        let (mut sink, bus) = sink_with_bus(1024);
        sink.write_all(b"streamed ").await.unwrap();
        sink.write_all(b"bytes").await.unwrap();
        sink.shutdown().await.unwrap();
        drop(sink);

        let messages = wait_for_messages(&bus, 1).await;
        assert_eq!(messages[0].key, "/srv/ftp/file.bin");
        assert_eq!(messages[0], PublishedMessage::encode("/srv/ftp/file.bin", b"streamed bytes"));
    }

    #[tokio::test]
    async fn writes_after_seal_are_rejected() {
        let (mut sink, _bus) = sink_with_bus(1024);
        sink.write_chunk(b"data").unwrap();
        sink.seal();
        assert!(matches!(sink.write_chunk(b"late"), Err(TransferError::SinkClosed)));
    }
}
