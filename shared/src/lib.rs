//! # Tether Shared
//! Replicated collections whose host-side mutations are mirrored, in order,
//! onto any number of observers through snapshots and deltas.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use naia_serde::{BitCounter, BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

mod payload_writer;
mod replication;
mod sync;
mod types;

pub use payload_writer::PayloadWriter;
pub use replication::{
    broadcaster::SyncBroadcaster,
    error::{BroadcasterError, ReceiverError},
    payload::PayloadSections,
    receiver::{ReceiveOutcome, SyncReceiver},
};
pub use sync::{
    config::SyncDictionaryConfig,
    error::{SyncDictionaryError, SyncStreamError},
    listener::{
        DictionaryEvent, DictionaryEventQueue, ListenerKey, ListenerSet, SyncDictionaryListener,
    },
    operation::{DictionaryOperation, OperationKind},
    operation_log::OperationLog,
    storage::DictionaryStorage,
    sync_dictionary::SyncDictionary,
    sync_object::SyncObject,
};
pub use types::{OpCount, SyncRole};
