//! GELF wire format — the on-wire layout of every datagram.
//!
//! Every GELF UDP datagram opens with a 2-byte big-endian marker that
//! identifies it as a gzip stream, a zlib stream, or one chunk of a larger
//! message. These values ARE the protocol; changing anything here breaks
//! interoperability with every GELF sender in existence.
//!
//! The chunk header is #[repr(C, packed)] with zerocopy derives for safe,
//! allocation-free parsing. There is no unsafe code in this module.

use bytes::{BufMut, Bytes, BytesMut};
use static_assertions::assert_eq_size;
use zerocopy::{AsBytes, FromBytes, FromZeroes};

// ── Markers ──────────────────────────────────────────────────────────────────

/// Marker of a gzip-compressed message (the gzip magic itself).
pub const MAGIC_GZIP: u16 = 0x1f8b;

/// Marker of a zlib-compressed message (the common zlib header bytes).
pub const MAGIC_ZLIB: u16 = 0x789c;

/// Marker of a chunked message.
pub const MAGIC_CHUNKED: u16 = 0x1e0f;

/// Read a datagram's leading marker. `None` if the datagram is shorter
/// than the 2-byte marker.
pub fn read_marker(data: &[u8]) -> Option<u16> {
    if data.len() < 2 {
        return None;
    }
    Some(u16::from_be_bytes([data[0], data[1]]))
}

// ── Chunk header ─────────────────────────────────────────────────────────────

/// Correlation key of a multi-chunk message. 8 opaque bytes chosen by the
/// sender; never interpreted, only compared.
pub type MessageId = [u8; 8];

/// Header of one chunk of a chunked message. Wire size: 12 bytes.
///
/// The fragment payload follows immediately after this header and runs to
/// the end of the datagram. A fragment payload may be empty.
#[derive(Debug, Clone, AsBytes, FromBytes, FromZeroes)]
#[repr(C, packed)]
pub struct ChunkHeader {
    /// Always MAGIC_CHUNKED, big-endian. Re-checked by the parser.
    pub magic: [u8; 2],

    /// Correlation key grouping this chunk with its siblings.
    pub message_id: MessageId,

    /// Position of this fragment, 0-based. Must be < seq_total.
    pub seq_number: u8,

    /// Declared number of fragments in the whole message, 1-128.
    pub seq_total: u8,
}

// Compile-time size guard. If this fails, the wire format has silently changed.
assert_eq_size!(ChunkHeader, [u8; 12]);

/// Size of the chunk header in bytes.
pub const CHUNK_HEADER_LEN: usize = 12;

/// Maximum number of chunks a message may be split into.
/// Fixed by the GELF protocol; receivers reject higher totals.
pub const MAX_CHUNKS: usize = 128;

/// Default datagram budget for the encode side. Matches the chunk size
/// Graylog senders use to stay under typical path MTUs with headroom.
pub const DEFAULT_CHUNK_MTU: usize = 8192;

impl ChunkHeader {
    pub fn new(message_id: MessageId, seq_number: u8, seq_total: u8) -> Self {
        Self {
            magic: MAGIC_CHUNKED.to_be_bytes(),
            message_id,
            seq_number,
            seq_total,
        }
    }
}

// ── Encode side ──────────────────────────────────────────────────────────────

/// Split an already-compressed payload into chunked datagrams of at most
/// `mtu` bytes each, under a freshly generated message id.
///
/// The payload must itself start with a gzip or zlib marker — the receiver
/// feeds the reassembled bytes straight back through its decompressor.
pub fn split_into_chunks(payload: &[u8], mtu: usize) -> Result<Vec<Bytes>, WireError> {
    if mtu <= CHUNK_HEADER_LEN {
        return Err(WireError::MtuTooSmall(mtu));
    }

    let chunk_size = mtu - CHUNK_HEADER_LEN;
    let chunk_count = payload.len().div_ceil(chunk_size);
    if chunk_count > MAX_CHUNKS {
        return Err(WireError::TooManyChunks(chunk_count));
    }
    if chunk_count == 0 {
        return Err(WireError::EmptyPayload);
    }

    let message_id: MessageId = rand::random();

    let datagrams = payload
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, fragment)| {
            let header = ChunkHeader::new(message_id, i as u8, chunk_count as u8);
            let mut buf = BytesMut::with_capacity(CHUNK_HEADER_LEN + fragment.len());
            buf.put_slice(header.as_bytes());
            buf.put_slice(fragment);
            buf.freeze()
        })
        .collect();

    Ok(datagrams)
}

// ── Errors ───────────────────────────────────────────────────────────────────

/// Errors that can arise when producing wire-format data.
/// Decode-side failures live in [`crate::error::DecodeError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("payload would need {0} chunks, maximum is {}", MAX_CHUNKS)]
    TooManyChunks(usize),

    #[error("mtu {0} leaves no room for a fragment after the {}-byte header", CHUNK_HEADER_LEN)]
    MtuTooSmall(usize),

    #[error("refusing to chunk an empty payload")]
    EmptyPayload,
}

// ── Tests ────────────────────────────────────────────────────────────────────
