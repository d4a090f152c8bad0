//! Compressed-message round trips through the full decode path.

use crate::*;
use bytes::Bytes;
use gelf_core::config::DecoderConfig;
use gelf_core::DecodeError;
use gelf_decoder::{GelfDecoder, GelfEvent};

#[tokio::test]
async fn gzip_datagram_round_trips() {
    let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());

    let record = sample_record();
    decoder
        .feed(Bytes::from(gzip(record.to_string().as_bytes())))
        .await;

    match next_event(&mut events).await {
        GelfEvent::Message(decoded) => assert_eq!(decoded, record),
        other => panic!("expected decoded record, got {other:?}"),
    }
    assert_no_event(&mut events).await;
}

#[tokio::test]
async fn zlib_datagram_round_trips() {
    let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());

    let record = sample_record();
    decoder
        .feed(Bytes::from(zlib(record.to_string().as_bytes())))
        .await;

    match next_event(&mut events).await {
        GelfEvent::Message(decoded) => assert_eq!(decoded, record),
        other => panic!("expected decoded record, got {other:?}"),
    }
}

#[tokio::test]
async fn valid_compression_of_non_json_is_malformed_record() {
    let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());

    decoder
        .feed(Bytes::from(gzip(b"syslog line, not a gelf record")))
        .await;
    assert!(matches!(
        next_event(&mut events).await,
        GelfEvent::Error(DecodeError::MalformedRecord(_))
    ));
}

#[tokio::test]
async fn truncated_gzip_stream_is_decompression_failure() {
    let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());

    let mut body = gzip(sample_record().to_string().as_bytes());
    body.truncate(8);
    decoder.feed(Bytes::from(body)).await;
    assert!(matches!(
        next_event(&mut events).await,
        GelfEvent::Error(DecodeError::DecompressionFailed(_))
    ));
}

#[tokio::test]
async fn reassembled_payload_must_be_compressed() {
    let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());

    // A sender chunked a plaintext record. Reassembly succeeds but the
    // decompressor re-validates the marker and rejects the result.
    decoder
        .feed(chunk_datagram([1; 8], 0, 2, b"{\"short_message\":"))
        .await;
    decoder.feed(chunk_datagram([1; 8], 1, 2, b"\"oops\"}")).await;

    match next_event(&mut events).await {
        GelfEvent::Error(DecodeError::InvalidCompressionType(0x7b22)) => {}
        other => panic!("expected InvalidCompressionType, got {other:?}"),
    }
    assert_eq!(decoder.in_progress().await, 0);
}
