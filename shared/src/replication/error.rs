use thiserror::Error;

use crate::sync::error::SyncStreamError;

/// Errors that can occur while managing the observers of a replicated object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcasterError {
    /// Observer was added twice
    #[error("Observer is already registered with this SyncBroadcaster")]
    ObserverAlreadyExists,

    /// Observer is not registered
    #[error("Observer is not registered with this SyncBroadcaster. Call add_observer() first")]
    ObserverNotFound,
}

/// Errors that can occur while applying an incoming payload to a mirror
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiverError {
    /// The payload could not be decoded. The mirror no longer matches the
    /// authoritative side and must be re-synchronized from a snapshot.
    #[error("Mirror diverged from authoritative state and needs a fresh snapshot: {source}")]
    Diverged { source: SyncStreamError },
}
