//! gelf-decoder — the GELF UDP decode engine.
//!
//! Feed raw datagrams in, read decoded records (or typed errors) off the
//! event channel. The UDP socket and the event consumer are the caller's
//! business; this crate owns everything in between: type dispatch,
//! gzip/zlib inflation, chunk reassembly, and timeout-based eviction of
//! reassemblies that never complete.
//!
//! ```no_run
//! # async fn demo(datagram: bytes::Bytes) {
//! use gelf_core::config::DecoderConfig;
//! use gelf_decoder::{GelfDecoder, GelfEvent};
//!
//! let (decoder, mut events) = GelfDecoder::new(DecoderConfig::default());
//! decoder.feed(datagram).await;
//! match events.recv().await {
//!     Some(GelfEvent::Message(record)) => println!("{record}"),
//!     Some(GelfEvent::Error(err)) => eprintln!("{err}"),
//!     None => {}
//! }
//! # }
//! ```

mod decoder;
mod decompress;
mod event;
mod reaper;
mod reassembly;

pub use decoder::GelfDecoder;
pub use decompress::uncompress;
pub use event::GelfEvent;
