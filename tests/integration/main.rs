//! GELF decoder integration tests.
//!
//! Everything here goes through the decoder's public surface only: build a
//! datagram the way a real sender would, `feed` it, and read the event
//! channel. Individual test areas live in the modules below; this file is
//! the shared harness.

use std::io::Write;
use std::time::Duration;

use bytes::Bytes;
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use zerocopy::AsBytes;

use gelf_core::wire::ChunkHeader;
use gelf_decoder::GelfEvent;

mod chunking;
mod roundtrip;

// ── Harness ──────────────────────────────────────────────────────────────────

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// A representative GELF record.
pub fn sample_record() -> serde_json::Value {
    serde_json::json!({
        "version": "1.1",
        "host": "web01",
        "short_message": "the quick brown fox",
        "level": 6,
        "_request_id": "c0ffee"
    })
}

/// Build one chunked datagram: 12-byte header + fragment payload.
pub fn chunk_datagram(id: [u8; 8], seq: u8, total: u8, payload: &[u8]) -> Bytes {
    let mut datagram = ChunkHeader::new(id, seq, total).as_bytes().to_vec();
    datagram.extend_from_slice(payload);
    Bytes::from(datagram)
}

/// Receive the next event or panic. Only for tests on the real clock —
/// paused-clock tests await the channel directly.
pub async fn next_event(
    events: &mut tokio::sync::mpsc::UnboundedReceiver<GelfEvent>,
) -> GelfEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for a decoder event")
        .expect("event channel closed")
}

/// Assert the channel stays quiet. Gives spawned decompression tasks a
/// moment to (wrongly) produce something before checking.
pub async fn assert_no_event(events: &mut tokio::sync::mpsc::UnboundedReceiver<GelfEvent>) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    match events.try_recv() {
        Err(tokio::sync::mpsc::error::TryRecvError::Empty) => {}
        other => panic!("expected no event, got {other:?}"),
    }
}
