use naia_serde::{BitReader, BitWrite};

use super::error::SyncStreamError;

/// A replicated object the replication layer can drive without knowing its
/// element types.
///
/// The authoritative side calls the `encode_*` methods and `flush`; mirrors
/// only ever call the `decode_*` methods.
pub trait SyncObject {
    /// True while operations are waiting to be sent as a delta
    fn is_dirty(&self) -> bool;

    /// Writes full state plus the count of operations still pending after it
    fn encode_snapshot(&self, writer: &mut dyn BitWrite);

    /// Writes every operation recorded since the last flush
    fn encode_delta(&self, writer: &mut dyn BitWrite);

    /// Replaces local state with a snapshot, turning this instance into a mirror
    fn decode_snapshot(&mut self, reader: &mut BitReader) -> Result<(), SyncStreamError>;

    /// Applies a delta batch, skipping operations the last snapshot already holds
    fn decode_delta(&mut self, reader: &mut BitReader) -> Result<(), SyncStreamError>;

    /// Discards recorded operations once they have been queued for every observer
    fn flush(&mut self);

    /// Returns to the empty, authoritative state
    fn reset(&mut self);
}
