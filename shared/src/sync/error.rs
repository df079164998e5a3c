use thiserror::Error;

use naia_serde::SerdeErr;

/// Errors returned by the mutation and bulk-copy API of a replicated collection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncDictionaryError {
    /// Application code attempted to mutate a mirror instance
    #[error("SyncDictionary mirrors can only be modified by synchronization. Cannot {operation} on a read-only instance")]
    ReadOnlyViolation { operation: &'static str },

    /// `add` was called with a key that is already present
    #[error("Key already present in SyncDictionary. Use set() to replace an existing value")]
    DuplicateKey,

    /// Destination index lies past the end of the destination slice
    #[error("Destination index {index} out of range for slice of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Destination slice cannot hold every entry from the given index onward
    #[error("Cannot copy {needed} entries into {available} remaining destination slots")]
    InsufficientCapacity { needed: usize, available: usize },
}

/// Errors raised while decoding a snapshot or delta.
///
/// A decode that fails leaves the collection exactly as it was; the mirror is
/// nonetheless considered diverged and should be re-synchronized from a fresh
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncStreamError {
    /// Operation tag outside of the known set
    #[error("Unknown SyncDictionary operation tag {tag}")]
    UnknownOperation { tag: u8 },

    /// Stream ended or held an invalid value in the middle of a record
    #[error("Malformed {record} in sync stream")]
    Truncated { record: &'static str },

    /// Snapshot listed the same key twice
    #[error("Snapshot contains a duplicate key at entry {entry}")]
    DuplicateSnapshotKey { entry: u32 },
}

impl SyncStreamError {
    pub(crate) fn truncated(record: &'static str) -> impl FnOnce(SerdeErr) -> Self {
        move |_| Self::Truncated { record }
    }
}
