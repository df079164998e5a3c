use std::{collections::HashMap, hash::Hash};

use log::warn;

use naia_serde::Serde;

use crate::types::{OpCount, SyncRole};

use super::{
    config::SyncDictionaryConfig,
    error::SyncDictionaryError,
    listener::{ListenerKey, ListenerSet, SyncDictionaryListener},
    operation::DictionaryOperation,
    operation_log::OperationLog,
    storage::DictionaryStorage,
};

/// A keyed collection replicated from one authoritative instance to any
/// number of read-only mirrors.
///
/// On the authoritative side every mutating call is applied locally,
/// notified to listeners and recorded in the Operation Log, which is later
/// sent to observers as a delta (see `encode_delta`). Observers that join
/// late receive a snapshot instead (see `encode_snapshot`). Mirrors reject
/// every mutating call with `ReadOnlyViolation`.
pub struct SyncDictionary<K, V, S = HashMap<K, V>> {
    pub(super) storage: S,
    pub(super) role: SyncRole,
    pub(super) operations: OperationLog<K, V>,
    // delta operations still to be skipped because the last snapshot holds them
    pub(super) changes_ahead: OpCount,
    pub(super) listeners: ListenerSet<K, V>,
    pub(super) config: SyncDictionaryConfig,
}

impl<K: Serde + Eq + Hash, V: Serde> SyncDictionary<K, V, HashMap<K, V>> {
    /// Creates an empty, authoritative dictionary backed by a `HashMap`
    pub fn new() -> Self {
        Self::with_config(SyncDictionaryConfig::default())
    }
}

impl<K: Serde + Eq + Hash, V: Serde> Default for SyncDictionary<K, V, HashMap<K, V>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> SyncDictionary<K, V, S>
where
    K: Serde,
    V: Serde,
    S: DictionaryStorage<K, V>,
{
    /// Creates an empty, authoritative dictionary with the given storage type
    pub fn with_config(config: SyncDictionaryConfig) -> Self {
        Self {
            storage: S::with_capacity(config.initial_capacity),
            role: SyncRole::Authoritative,
            operations: OperationLog::new(),
            changes_ahead: 0,
            listeners: ListenerSet::new(),
            config,
        }
    }

    // Listeners

    pub fn add_listener(
        &mut self,
        listener: Box<dyn SyncDictionaryListener<K, V>>,
    ) -> ListenerKey {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, key: &ListenerKey) -> bool {
        self.listeners.remove(key)
    }

    // Mutation

    /// Inserts a new entry.
    ///
    /// Fails with `DuplicateKey` if the key is present, leaving the
    /// dictionary untouched.
    pub fn add(&mut self, key: K, value: V) -> Result<(), SyncDictionaryError> {
        self.ensure_writable("add")?;
        if self.storage.contains_key(&key) {
            return Err(SyncDictionaryError::DuplicateKey);
        }

        self.storage.insert(key.clone(), value.clone());
        self.listeners.inserted(&key, &value);
        self.record(DictionaryOperation::Add(key, value));
        Ok(())
    }

    /// Inserts or replaces an entry, returning the replaced value.
    ///
    /// Setting an absent key is recorded as an `Add`, an existing key as a
    /// `Set`.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>, SyncDictionaryError> {
        self.ensure_writable("set")?;

        match self.storage.insert(key.clone(), value.clone()) {
            Some(old_value) => {
                self.listeners.set(&key, &old_value, &value);
                self.record(DictionaryOperation::Set(key, value));
                Ok(Some(old_value))
            }
            None => {
                self.listeners.inserted(&key, &value);
                self.record(DictionaryOperation::Add(key, value));
                Ok(None)
            }
        }
    }

    /// Removes an entry, returning its value. Removing an absent key is a
    /// no-op that returns `None`, records nothing and notifies nobody.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>, SyncDictionaryError> {
        self.ensure_writable("remove")?;

        let Some(old_value) = self.storage.remove(key) else {
            return Ok(None);
        };

        self.listeners.removed(key, &old_value);
        self.record(DictionaryOperation::Remove(key.clone(), old_value.clone()));
        Ok(Some(old_value))
    }

    /// Removes an entry only if the key currently maps to `value`
    pub fn remove_entry(&mut self, key: &K, value: &V) -> Result<bool, SyncDictionaryError> {
        self.ensure_writable("remove_entry")?;

        if !self.contains(key, value) {
            return Ok(false);
        }

        self.remove(key).map(|removed| removed.is_some())
    }

    /// Removes every entry. Always recorded, even when already empty.
    pub fn clear(&mut self) -> Result<(), SyncDictionaryError> {
        self.ensure_writable("clear")?;

        self.storage.clear();
        self.listeners.cleared();
        self.record(DictionaryOperation::Clear);
        Ok(())
    }

    fn ensure_writable(&self, operation: &'static str) -> Result<(), SyncDictionaryError> {
        if self.role.is_mirror() {
            return Err(SyncDictionaryError::ReadOnlyViolation { operation });
        }
        Ok(())
    }

    fn record(&mut self, operation: DictionaryOperation<K, V>) {
        self.operations.push(operation);

        if self.config.pending_warning_threshold == Some(self.operations.len()) {
            warn!(
                "SyncDictionary has {} unflushed operations. Is the host flushing after each sync tick?",
                self.operations.len()
            );
        }

        self.listeners.changed();
    }

    // Read access

    pub fn get(&self, key: &K) -> Option<&V> {
        self.storage.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.storage.contains_key(key)
    }

    /// True if `key` is present and mapped to a value equal to `value`
    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.storage.get(key) == Some(value)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn iter(&self) -> S::Iter<'_> {
        self.storage.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.storage.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.storage.iter().map(|(_, value)| value)
    }

    /// Clones every entry into `destination`, starting at `index`, in
    /// iteration order
    pub fn copy_to(
        &self,
        destination: &mut [(K, V)],
        index: usize,
    ) -> Result<(), SyncDictionaryError> {
        if index > destination.len() {
            return Err(SyncDictionaryError::IndexOutOfRange {
                index,
                len: destination.len(),
            });
        }

        let available = destination.len() - index;
        if available < self.len() {
            return Err(SyncDictionaryError::InsufficientCapacity {
                needed: self.len(),
                available,
            });
        }

        for (slot, (key, value)) in destination[index..].iter_mut().zip(self.storage.iter()) {
            *slot = (key.clone(), value.clone());
        }
        Ok(())
    }

    // Replication state

    pub fn role(&self) -> SyncRole {
        self.role
    }

    pub fn is_read_only(&self) -> bool {
        self.role.is_mirror()
    }

    pub fn is_dirty(&self) -> bool {
        !self.operations.is_empty()
    }

    pub fn pending_operations(&self) -> usize {
        self.operations.len()
    }

    pub fn operations(&self) -> &[DictionaryOperation<K, V>] {
        self.operations.as_slice()
    }

    pub fn changes_ahead(&self) -> OpCount {
        self.changes_ahead
    }

    // Lifecycle

    /// Discards the Operation Log without touching contents. Call once the
    /// log has been written into every observer's outgoing delta.
    pub fn flush(&mut self) {
        self.operations.clear();
    }

    /// Returns to the empty, authoritative state so the instance can be
    /// pooled. Registered listeners stay registered and are not notified.
    pub fn reset(&mut self) {
        self.role = SyncRole::Authoritative;
        self.operations.clear();
        self.changes_ahead = 0;
        self.storage.clear();
    }
}
