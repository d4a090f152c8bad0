use gelf_core::DecodeError;

/// Output of the decoder, delivered on the channel handed out by
/// [`crate::GelfDecoder::new`].
///
/// Two variants, two fates: a decoded record whose ownership transfers to
/// the consumer, or the typed reason a datagram went nowhere. Errors are
/// per-datagram — the decoder keeps accepting input after every one.
#[derive(Debug)]
pub enum GelfEvent {
    /// A fully decoded log record.
    Message(serde_json::Value),
    /// Why a datagram (or reassembled message) failed to decode.
    Error(DecodeError),
}
