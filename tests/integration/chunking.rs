//! Chunk reassembly through the public API.

use crate::*;
use gelf_core::config::DecoderConfig;
use gelf_core::wire::{split_into_chunks, CHUNK_HEADER_LEN};
use gelf_core::DecodeError;
use gelf_decoder::{GelfDecoder, GelfEvent};

#[tokio::test]
async fn out_of_order_fragments_reassemble_correctly() {
    let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());

    let record = sample_record();
    let compressed = gzip(record.to_string().as_bytes());
    let fragments: Vec<&[u8]> = compressed.chunks(4).collect();
    let total = fragments.len() as u8;

    // Worst case arrival: strictly reverse order.
    for (i, fragment) in fragments.iter().enumerate().rev() {
        decoder
            .feed(chunk_datagram([0xAA; 8], i as u8, total, fragment))
            .await;
    }

    match next_event(&mut events).await {
        GelfEvent::Message(decoded) => assert_eq!(decoded, record),
        other => panic!("expected decoded record, got {other:?}"),
    }
    assert_eq!(decoder.in_progress().await, 0);
    assert_no_event(&mut events).await;
}

#[tokio::test]
async fn duplicate_fragment_delivery_is_idempotent() {
    let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());

    let record = sample_record();
    let compressed = zlib(record.to_string().as_bytes());
    let split = compressed.len() / 2;

    let first = chunk_datagram([0xBB; 8], 0, 2, &compressed[..split]);
    decoder.feed(first.clone()).await;
    decoder.feed(first.clone()).await; // UDP duplicate of the same chunk
    assert_eq!(decoder.in_progress().await, 1);

    decoder
        .feed(chunk_datagram([0xBB; 8], 1, 2, &compressed[split..]))
        .await;
    decoder.feed(first).await; // straggler after completion

    match next_event(&mut events).await {
        GelfEvent::Message(decoded) => assert_eq!(decoded, record),
        other => panic!("expected decoded record, got {other:?}"),
    }
    // The straggler opened a fresh (incomplete) entry but must not have
    // produced a second record.
    assert_no_event(&mut events).await;
}

#[tokio::test]
async fn two_fragments_with_empty_tail_complete() {
    let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());

    let record = serde_json::json!({"msg": "hello"});
    let compressed = zlib(record.to_string().as_bytes());

    decoder.feed(chunk_datagram([0xCC; 8], 0, 2, &compressed)).await;
    decoder.feed(chunk_datagram([0xCC; 8], 1, 2, b"")).await;

    match next_event(&mut events).await {
        GelfEvent::Message(decoded) => assert_eq!(decoded, record),
        other => panic!("expected decoded record, got {other:?}"),
    }
    assert_eq!(decoder.in_progress().await, 0);
}

#[tokio::test]
async fn chunked_datagram_shorter_than_header_is_rejected() {
    let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());

    // Marker says chunked, but the header is cut short.
    let truncated = chunk_datagram([0xDD; 8], 0, 1, b"").slice(..CHUNK_HEADER_LEN - 1);
    decoder.feed(truncated).await;

    assert!(matches!(
        next_event(&mut events).await,
        GelfEvent::Error(DecodeError::InvalidChunkedMessage)
    ));
    assert_eq!(decoder.in_progress().await, 0);
}

#[tokio::test]
async fn out_of_range_sequence_number_is_rejected() {
    let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());

    decoder.feed(chunk_datagram([0xEE; 8], 5, 3, b"beyond")).await;
    assert!(matches!(
        next_event(&mut events).await,
        GelfEvent::Error(DecodeError::InvalidChunkedMessage)
    ));
    assert_eq!(decoder.in_progress().await, 0);
}

#[tokio::test]
async fn encode_side_output_decodes_end_to_end() {
    let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());

    let record = sample_record();
    let compressed = gzip(record.to_string().as_bytes());
    // Pick an mtu that forces a multi-datagram split whatever the
    // compressed size turns out to be.
    let mtu = (compressed.len() / 3).max(CHUNK_HEADER_LEN + 1);
    let datagrams = split_into_chunks(&compressed, mtu).unwrap();
    assert!(datagrams.len() > 1);

    for datagram in datagrams {
        decoder.feed(datagram).await;
    }

    match next_event(&mut events).await {
        GelfEvent::Message(decoded) => assert_eq!(decoded, record),
        other => panic!("expected decoded record, got {other:?}"),
    }
    assert_eq!(decoder.in_progress().await, 0);
}
