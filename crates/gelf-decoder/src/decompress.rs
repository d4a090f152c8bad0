//! Inflation and record parsing — the tail end of both decode paths.

use std::io::Read;

use flate2::read::{GzDecoder, ZlibDecoder};
use gelf_core::wire::{read_marker, MAGIC_GZIP, MAGIC_ZLIB};
use gelf_core::DecodeError;

/// Inflate a gzip or zlib stream and parse the result as a JSON record.
///
/// Re-validates the leading marker: this function is reachable both from a
/// single compressed datagram and from reassembled chunk output, and the
/// latter carries whatever bytes the sender chunked — which need not be a
/// compressed stream at all.
pub fn uncompress(data: &[u8]) -> Result<serde_json::Value, DecodeError> {
    let marker = read_marker(data).ok_or(DecodeError::InvalidMessage)?;

    let mut inflated = Vec::new();
    match marker {
        MAGIC_GZIP => GzDecoder::new(data)
            .read_to_end(&mut inflated)
            .map_err(DecodeError::DecompressionFailed)?,
        MAGIC_ZLIB => ZlibDecoder::new(data)
            .read_to_end(&mut inflated)
            .map_err(DecodeError::DecompressionFailed)?,
        other => return Err(DecodeError::InvalidCompressionType(other)),
    };

    serde_json::from_slice(&inflated).map_err(DecodeError::MalformedRecord)
}
