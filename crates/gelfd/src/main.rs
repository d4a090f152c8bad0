//! gelfd — reference GELF UDP receiver.
//!
//! Binds a UDP socket, feeds every datagram to the decoder, and logs the
//! decoded records. The decoder does all the real work; this binary is the
//! transport and sink glue the library deliberately leaves to its caller.

use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use tokio::net::UdpSocket;

use gelf_core::config::GelfConfig;
use gelf_decoder::{GelfDecoder, GelfEvent};

#[tokio::main]
async fn main() -> Result<()> {
    // Load config first so the debug flag can shape the default filter.
    if let Err(e) = GelfConfig::write_default_if_missing() {
        eprintln!("warning: failed to write default config: {e}");
    }
    let config = GelfConfig::load().unwrap_or_else(|e| {
        eprintln!("warning: failed to load config, using defaults: {e}");
        GelfConfig::default()
    });

    let default_level = if config.decoder.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let bind = format!("{}:{}", config.listen.bind, config.listen.port);
    let socket = Arc::new(
        UdpSocket::bind(&bind)
            .await
            .with_context(|| format!("failed to bind UDP socket on {bind}"))?,
    );
    tracing::info!(addr = %bind, "gelfd listening");

    let (decoder, mut events) = GelfDecoder::new(config.decoder.clone());

    // Sink: decoded records and per-datagram errors.
    let sink = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                GelfEvent::Message(record) => tracing::info!(%record, "message"),
                GelfEvent::Error(err) => tracing::warn!(error = %err, "decode error"),
            }
        }
    });

    let mut buf = vec![0u8; 65536];
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                decoder.shutdown();
                break;
            }
            result = socket.recv_from(&mut buf) => {
                let (len, peer) = match result {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!(error = %e, "recv_from failed");
                        continue;
                    }
                };
                tracing::trace!(%peer, len, "datagram received");
                decoder.feed(Bytes::copy_from_slice(&buf[..len])).await;
            }
        }
    }

    drop(decoder);
    sink.abort();
    Ok(())
}
