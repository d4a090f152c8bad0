//! The chunk pool — per-message reassembly state.
//!
//! One `Assembly` per in-flight message id, created by the first chunk seen
//! and destroyed either on completion (fragments concatenated and returned)
//! or by the reaper once it outlives the chunk timeout. The pool itself is
//! not synchronized; [`crate::GelfDecoder`] owns it behind a single mutex,
//! and completion removal happens inside `accept` so retrieve-and-remove is
//! one step under that lock.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use gelf_core::wire::ChunkHeader;
use gelf_core::{DecodeError, MessageId};
use tokio::time::Instant;

struct Assembly {
    /// Sequence number → fragment payload. Duplicates are never overwritten.
    fragments: HashMap<u8, Bytes>,
    /// Declared fragment count, fixed by the first chunk seen for this id.
    total: u8,
    /// When the first chunk arrived. The reaper's eviction clock.
    started_at: Instant,
}

#[derive(Default)]
pub(crate) struct ChunkPool {
    entries: HashMap<MessageId, Assembly>,
}

impl ChunkPool {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record one fragment. Returns the concatenated message once every
    /// declared fragment has arrived; the entry is gone from the pool by
    /// the time the payload is returned.
    pub(crate) fn accept(
        &mut self,
        header: &ChunkHeader,
        payload: Bytes,
    ) -> Result<Option<Bytes>, DecodeError> {
        let seq = header.seq_number;
        let declared_total = header.seq_total;
        if declared_total == 0 || seq >= declared_total {
            return Err(DecodeError::InvalidChunkedMessage);
        }

        let id = header.message_id;
        let entry = self.entries.entry(id).or_insert_with(|| {
            tracing::debug!(
                message_id = %hex::encode(id),
                total = declared_total,
                "first chunk for message, tracking reassembly"
            );
            Assembly {
                fragments: HashMap::new(),
                total: declared_total,
                started_at: Instant::now(),
            }
        });

        // Trust-first policy: the total declared by the first chunk stands.
        if entry.total != declared_total {
            tracing::warn!(
                message_id = %hex::encode(id),
                first = entry.total,
                declared = declared_total,
                "chunk declares a different total, keeping the first-seen value"
            );
        }
        if seq >= entry.total {
            return Err(DecodeError::InvalidChunkedMessage);
        }

        if entry.fragments.contains_key(&seq) {
            tracing::debug!(
                message_id = %hex::encode(id),
                seq,
                "duplicate fragment, ignoring"
            );
            return Ok(None);
        }
        entry.fragments.insert(seq, payload);

        if entry.fragments.len() < entry.total as usize {
            return Ok(None);
        }

        // Complete: every sequence number 0..total was seen exactly once.
        let Some(assembly) = self.entries.remove(&id) else {
            return Ok(None);
        };
        let size: usize = assembly.fragments.values().map(Bytes::len).sum();
        let mut message = Vec::with_capacity(size);
        for i in 0..assembly.total {
            if let Some(fragment) = assembly.fragments.get(&i) {
                message.extend_from_slice(fragment);
            }
        }
        tracing::debug!(
            message_id = %hex::encode(id),
            fragments = assembly.total,
            bytes = message.len(),
            "multipart message complete"
        );
        Ok(Some(Bytes::from(message)))
    }

    /// Drop every assembly older than `timeout`. Returns how many went.
    pub(crate) fn evict_expired(&mut self, timeout: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, assembly| {
            let stale = assembly.started_at.elapsed() > timeout;
            if stale {
                tracing::debug!(
                    message_id = %hex::encode(id),
                    received = assembly.fragments.len(),
                    total = assembly.total,
                    "reassembly timed out, evicting"
                );
            }
            !stale
        });
        before - self.entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn contains(&self, id: &MessageId) -> bool {
        self.entries.contains_key(id)
    }
}
