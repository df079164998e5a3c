use log::{debug, trace, warn};

use naia_serde::{BitCounter, BitReader, BitWrite, Serde};

use crate::types::{OpCount, SyncRole, MAX_PREALLOCATED_RECORDS};

use super::{
    error::SyncStreamError, operation::DictionaryOperation, operation_log::OperationLog,
    storage::DictionaryStorage, sync_dictionary::SyncDictionary, sync_object::SyncObject,
};

// Snapshot:  entry_count: u32 | (key, value) * entry_count | pending_count: u32
// Delta:     op_count: u32 | (tag: u8, payload) * op_count

impl<K, V, S> SyncDictionary<K, V, S>
where
    K: Serde,
    V: Serde,
    S: DictionaryStorage<K, V>,
{
    /// Writes the full contents followed by the number of logged operations
    /// not yet flushed. Those operations are already reflected in the
    /// contents, so the receiving mirror skips them when they arrive as a
    /// delta.
    pub fn encode_snapshot(&self, writer: &mut dyn BitWrite) {
        (self.storage.len() as OpCount).ser(writer);
        for (key, value) in self.storage.iter() {
            key.ser(writer);
            value.ser(writer);
        }
        (self.operations.len() as OpCount).ser(writer);
    }

    /// Writes the Operation Log. The log is left intact; call `flush` once
    /// every observer's delta has been queued.
    pub fn encode_delta(&self, writer: &mut dyn BitWrite) {
        self.operations.write(writer);
    }

    pub fn snapshot_bit_length(&self) -> u32 {
        let mut counter = BitCounter::new(0, 0, u32::MAX);
        self.encode_snapshot(&mut counter);
        counter.bits_needed()
    }

    pub fn delta_bit_length(&self) -> u32 {
        let mut counter = BitCounter::new(0, 0, u32::MAX);
        self.encode_delta(&mut counter);
        counter.bits_needed()
    }

    /// Replaces local contents with a snapshot and becomes a read-only
    /// mirror.
    ///
    /// The whole snapshot is read before anything is applied, so a malformed
    /// stream leaves the dictionary untouched.
    pub fn decode_snapshot(&mut self, reader: &mut BitReader) -> Result<(), SyncStreamError> {
        let count =
            OpCount::de(reader).map_err(SyncStreamError::truncated("snapshot entry count"))?;

        let capacity = (count as usize).min(MAX_PREALLOCATED_RECORDS);
        let mut incoming = S::with_capacity(capacity);
        // wire order, which is also notification order
        let mut entries = Vec::with_capacity(capacity);
        for entry in 0..count {
            let key = K::de(reader).map_err(SyncStreamError::truncated("snapshot key"))?;
            let value = V::de(reader).map_err(SyncStreamError::truncated("snapshot value"))?;
            if incoming.contains_key(&key) {
                return Err(SyncStreamError::DuplicateSnapshotKey { entry });
            }
            incoming.insert(key.clone(), value.clone());
            entries.push((key, value));
        }

        let pending =
            OpCount::de(reader).map_err(SyncStreamError::truncated("snapshot pending count"))?;

        self.apply_snapshot(incoming, entries, pending);
        Ok(())
    }

    fn apply_snapshot(&mut self, incoming: S, entries: Vec<(K, V)>, pending: OpCount) {
        if self.changes_ahead > 0 {
            warn!(
                "Snapshot replaced a mirror with {} unreconciled delta operations still expected",
                self.changes_ahead
            );
        }

        self.become_mirror();

        let had_entries = !self.storage.is_empty();
        self.storage = incoming;
        if had_entries {
            self.listeners.cleared();
        }
        for (key, value) in &entries {
            self.listeners.inserted(key, value);
        }

        self.changes_ahead = pending;
        debug!(
            "Applied SyncDictionary snapshot: {} entries, {} operations ahead",
            self.storage.len(),
            pending
        );

        self.listeners.changed();
    }

    /// Applies a delta batch received from the authoritative side.
    ///
    /// The first `changes_ahead` operations are consumed without being
    /// applied or notified. The batch is read in full before anything is
    /// applied, so a malformed stream leaves the dictionary untouched.
    pub fn decode_delta(&mut self, reader: &mut BitReader) -> Result<(), SyncStreamError> {
        let incoming = OperationLog::<K, V>::read(reader)?;

        self.become_mirror();

        let mut applied = false;
        for operation in incoming {
            if self.changes_ahead > 0 {
                self.changes_ahead -= 1;
                trace!(
                    "Skipped {} operation already contained in snapshot, {} left to skip",
                    operation.kind(),
                    self.changes_ahead
                );
                continue;
            }

            self.replay(operation);
            applied = true;
        }

        if applied {
            self.listeners.changed();
        }
        Ok(())
    }

    fn become_mirror(&mut self) {
        self.role = SyncRole::Mirror;
        self.operations.clear();
    }

    // Replay uses the key/value carried on the wire. A mismatch with local
    // state means the streams were not delivered in order.
    fn replay(&mut self, operation: DictionaryOperation<K, V>) {
        match operation {
            DictionaryOperation::Add(key, value) => {
                match self.storage.insert(key.clone(), value.clone()) {
                    None => self.listeners.inserted(&key, &value),
                    Some(old_value) => {
                        warn!("Replayed Add over a key already present on the mirror");
                        self.listeners.set(&key, &old_value, &value);
                    }
                }
            }
            DictionaryOperation::Set(key, value) => {
                match self.storage.insert(key.clone(), value.clone()) {
                    Some(old_value) => self.listeners.set(&key, &old_value, &value),
                    None => {
                        warn!("Replayed Set for a key missing on the mirror");
                        self.listeners.inserted(&key, &value);
                    }
                }
            }
            DictionaryOperation::Remove(key, value) => {
                if self.storage.remove(&key).is_none() {
                    warn!("Replayed Remove for a key missing on the mirror");
                }
                self.listeners.removed(&key, &value);
            }
            DictionaryOperation::Clear => {
                self.storage.clear();
                self.listeners.cleared();
            }
        }
    }
}

impl<K, V, S> SyncObject for SyncDictionary<K, V, S>
where
    K: Serde,
    V: Serde,
    S: DictionaryStorage<K, V>,
{
    fn is_dirty(&self) -> bool {
        SyncDictionary::is_dirty(self)
    }

    fn encode_snapshot(&self, writer: &mut dyn BitWrite) {
        SyncDictionary::encode_snapshot(self, writer);
    }

    fn encode_delta(&self, writer: &mut dyn BitWrite) {
        SyncDictionary::encode_delta(self, writer);
    }

    fn decode_snapshot(&mut self, reader: &mut BitReader) -> Result<(), SyncStreamError> {
        SyncDictionary::decode_snapshot(self, reader)
    }

    fn decode_delta(&mut self, reader: &mut BitReader) -> Result<(), SyncStreamError> {
        SyncDictionary::decode_delta(self, reader)
    }

    fn flush(&mut self) {
        SyncDictionary::flush(self);
    }

    fn reset(&mut self) {
        SyncDictionary::reset(self);
    }
}
