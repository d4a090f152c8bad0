//! gelf-send — send a GELF record over UDP.
//!
//! Compresses a JSON record (gzip by default, zlib with --zlib) and sends
//! it to a GELF endpoint, splitting into chunked datagrams when the
//! compressed payload exceeds the datagram budget. Useful for poking a
//! running gelfd.

use std::io::Write;

use anyhow::{bail, Context, Result};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use tokio::net::UdpSocket;

use gelf_core::wire::{split_into_chunks, DEFAULT_CHUNK_MTU};

fn usage() -> ! {
    eprintln!("usage: gelf-send [options] <json | @file>");
    eprintln!();
    eprintln!("options:");
    eprintln!("  --target <host:port>   destination (default 127.0.0.1:12201)");
    eprintln!("  --zlib                 compress with zlib instead of gzip");
    eprintln!("  --mtu <bytes>          datagram budget (default {DEFAULT_CHUNK_MTU})");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut target = "127.0.0.1:12201".to_string();
    let mut use_zlib = false;
    let mut mtu = DEFAULT_CHUNK_MTU;
    let mut record_arg: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--target" => {
                i += 1;
                target = args.get(i).cloned().unwrap_or_else(|| usage());
            }
            "--zlib" => use_zlib = true,
            "--mtu" => {
                i += 1;
                mtu = args
                    .get(i)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(|| usage());
            }
            "--help" | "-h" => usage(),
            other => {
                if record_arg.is_some() {
                    usage();
                }
                record_arg = Some(other.to_string());
            }
        }
        i += 1;
    }

    let Some(record_arg) = record_arg else { usage() };

    let raw = if let Some(path) = record_arg.strip_prefix('@') {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
    } else {
        record_arg
    };

    // Validate before sending — a receiver would only tell us via its logs.
    let record: serde_json::Value =
        serde_json::from_str(&raw).context("record is not valid JSON")?;
    let body = serde_json::to_vec(&record)?;

    let compressed = if use_zlib {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&body)?;
        enc.finish()?
    } else {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&body)?;
        enc.finish()?
    };

    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .context("failed to bind local socket")?;
    socket
        .connect(&target)
        .await
        .with_context(|| format!("failed to resolve {target}"))?;

    if compressed.len() <= mtu {
        socket.send(&compressed).await.context("send failed")?;
        println!("sent 1 datagram ({} bytes) to {target}", compressed.len());
    } else {
        let datagrams = match split_into_chunks(&compressed, mtu) {
            Ok(d) => d,
            Err(e) => bail!("cannot chunk payload: {e}"),
        };
        let count = datagrams.len();
        for datagram in datagrams {
            socket.send(&datagram).await.context("send failed")?;
        }
        println!(
            "sent {count} chunked datagrams ({} compressed bytes) to {target}",
            compressed.len()
        );
    }

    Ok(())
}
