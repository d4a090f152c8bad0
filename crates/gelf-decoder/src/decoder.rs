//! The decoder front door: type dispatch and chunk handling.

use std::sync::Arc;

use bytes::Bytes;
use gelf_core::config::DecoderConfig;
use gelf_core::wire::{
    read_marker, ChunkHeader, CHUNK_HEADER_LEN, MAGIC_CHUNKED, MAGIC_GZIP, MAGIC_ZLIB,
};
use gelf_core::DecodeError;
use tokio::sync::{broadcast, mpsc, Mutex};
use zerocopy::FromBytes;

use crate::decompress::uncompress;
use crate::event::GelfEvent;
use crate::reaper;
use crate::reassembly::ChunkPool;

/// The GELF decode engine.
///
/// Construction spawns the reaper task; [`GelfDecoder::shutdown`] stops it.
/// `feed` never fails and never panics — every malformed datagram becomes a
/// [`GelfEvent::Error`] on the channel and processing continues.
pub struct GelfDecoder {
    pool: Arc<Mutex<ChunkPool>>,
    events: mpsc::UnboundedSender<GelfEvent>,
    shutdown: broadcast::Sender<()>,
}

impl GelfDecoder {
    /// Build a decoder and the receiving half of its event channel.
    ///
    /// Must be called from within a tokio runtime (the reaper is spawned
    /// here).
    pub fn new(config: DecoderConfig) -> (Self, mpsc::UnboundedReceiver<GelfEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let pool = Arc::new(Mutex::new(ChunkPool::new()));

        tokio::spawn(reaper::run(
            pool.clone(),
            config.chunk_timeout(),
            config.gc_timeout(),
            shutdown_rx,
        ));

        let decoder = Self {
            pool,
            events: events_tx,
            shutdown: shutdown_tx,
        };
        (decoder, events_rx)
    }

    /// Process one raw datagram, exactly as received from the socket.
    pub async fn feed(&self, datagram: Bytes) {
        let Some(marker) = read_marker(&datagram) else {
            self.emit_error(DecodeError::InvalidMessage);
            return;
        };

        match marker {
            MAGIC_GZIP | MAGIC_ZLIB => self.spawn_uncompress(datagram),
            MAGIC_CHUNKED => self.handle_chunk(datagram).await,
            other => self.emit_error(DecodeError::UnknownMessageType(other)),
        }
    }

    /// Number of messages currently awaiting missing fragments.
    pub async fn in_progress(&self) -> usize {
        self.pool.lock().await.len()
    }

    /// Stop the reaper. In-flight decompression tasks run to completion.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(());
    }

    /// Inflate-and-parse on the blocking pool so a large or slow stream
    /// never holds up datagram acceptance. Emission order across message
    /// ids follows completion order, not arrival order.
    fn spawn_uncompress(&self, data: Bytes) {
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match tokio::task::spawn_blocking(move || uncompress(&data)).await {
                Ok(Ok(record)) => GelfEvent::Message(record),
                Ok(Err(err)) => GelfEvent::Error(err),
                Err(join_err) => {
                    tracing::error!(error = %join_err, "decompression task failed");
                    return;
                }
            };
            let _ = events.send(event);
        });
    }

    async fn handle_chunk(&self, datagram: Bytes) {
        if datagram.len() < CHUNK_HEADER_LEN {
            self.emit_error(DecodeError::InvalidChunkedMessage);
            return;
        }
        // Length was just checked, so the prefix read cannot fail.
        let Some(header) = ChunkHeader::read_from_prefix(&datagram[..]) else {
            self.emit_error(DecodeError::InvalidChunkedMessage);
            return;
        };

        tracing::debug!(
            message_id = %hex::encode(header.message_id),
            seq = header.seq_number,
            total = header.seq_total,
            "chunk received"
        );

        let completed = {
            let mut pool = self.pool.lock().await;
            pool.accept(&header, datagram.slice(CHUNK_HEADER_LEN..))
        };

        match completed {
            Ok(Some(message)) => self.spawn_uncompress(message),
            Ok(None) => {}
            Err(err) => self.emit_error(err),
        }
    }

    fn emit_error(&self, err: DecodeError) {
        let _ = self.events.send(GelfEvent::Error(err));
    }
}
