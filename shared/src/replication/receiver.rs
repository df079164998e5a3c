use log::warn;

use naia_serde::BitReader;

use crate::sync::{error::SyncStreamError, sync_object::SyncObject};

use super::{error::ReceiverError, payload::PayloadSections};

/// What a `SyncReceiver` did with a payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// The payload was applied; `snapshot` tells whether it carried full state
    Applied { snapshot: bool },
    /// A delta arrived while still waiting for a snapshot and was dropped
    Discarded,
}

/// Observer-side counterpart of `SyncBroadcaster` for one mirrored object
pub struct SyncReceiver {
    awaiting_snapshot: bool,
}

impl SyncReceiver {
    pub fn new() -> Self {
        Self {
            awaiting_snapshot: true,
        }
    }

    /// True until a snapshot has been applied, and again after divergence
    pub fn awaiting_snapshot(&self) -> bool {
        self.awaiting_snapshot
    }

    /// Applies one payload to the mirror.
    ///
    /// On failure the receiver goes back to awaiting a snapshot; the caller
    /// should ask the host to re-send one (`SyncBroadcaster::request_snapshot`).
    pub fn receive(
        &mut self,
        object: &mut dyn SyncObject,
        payload: &[u8],
    ) -> Result<ReceiveOutcome, ReceiverError> {
        match self.apply(object, payload) {
            Ok(outcome) => Ok(outcome),
            Err(source) => {
                warn!("Mirror diverged while applying sync payload: {}", source);
                self.awaiting_snapshot = true;
                Err(ReceiverError::Diverged { source })
            }
        }
    }

    fn apply(
        &mut self,
        object: &mut dyn SyncObject,
        payload: &[u8],
    ) -> Result<ReceiveOutcome, SyncStreamError> {
        let mut reader = BitReader::new(payload);

        let has_snapshot = PayloadSections::read_snapshot_flag(&mut reader)?;
        if has_snapshot {
            object.decode_snapshot(&mut reader)?;
            self.awaiting_snapshot = false;
        } else if self.awaiting_snapshot {
            warn!("Discarding sync delta received before a snapshot");
            return Ok(ReceiveOutcome::Discarded);
        }

        if PayloadSections::read_delta_flag(&mut reader)? {
            object.decode_delta(&mut reader)?;
        }

        Ok(ReceiveOutcome::Applied {
            snapshot: has_snapshot,
        })
    }
}

impl Default for SyncReceiver {
    fn default() -> Self {
        Self::new()
    }
}
