//! Decode-side error taxonomy.
//!
//! Every failure mode of the decoder maps to exactly one variant here.
//! Errors are values delivered on the decoder's event channel; none of
//! them is fatal and none ever crosses the public boundary as a panic.

/// Why a datagram (or a reassembled message) failed to decode.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Datagram shorter than the 2-byte type marker.
    #[error("invalid message: shorter than the 2-byte type marker")]
    InvalidMessage,

    /// Leading marker is none of gzip / zlib / chunked.
    #[error("unknown message type (0x{0:04x})")]
    UnknownMessageType(u16),

    /// The decompressor was handed bytes that start with neither the gzip
    /// nor the zlib marker. Reachable from the reassembly path when a
    /// sender chunks an uncompressed or garbage payload.
    #[error("invalid compression type (0x{0:04x})")]
    InvalidCompressionType(u16),

    /// The marker was right but the stream would not inflate.
    #[error("decompression failed")]
    DecompressionFailed(#[source] std::io::Error),

    /// Inflation succeeded but the bytes are not a JSON record.
    #[error("decompressed payload is not a valid record")]
    MalformedRecord(#[source] serde_json::Error),

    /// Chunked datagram shorter than the 12-byte chunk header, a declared
    /// total of zero, or a sequence number at or past the declared total.
    #[error("invalid chunked message")]
    InvalidChunkedMessage,
}
