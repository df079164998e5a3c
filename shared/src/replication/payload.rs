use naia_serde::{BitReader, Serde};

use crate::{
    payload_writer::PayloadWriter,
    sync::{error::SyncStreamError, sync_object::SyncObject},
};

// hasSnapshot: bool | snapshot? | hasDelta: bool | delta?

/// Sections present in one observer payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayloadSections {
    pub snapshot: bool,
    pub delta: bool,
}

impl PayloadSections {
    pub fn write(self, object: &dyn SyncObject) -> Vec<u8> {
        let mut writer = PayloadWriter::new();

        self.snapshot.ser(&mut writer);
        if self.snapshot {
            object.encode_snapshot(&mut writer);
        }

        self.delta.ser(&mut writer);
        if self.delta {
            object.encode_delta(&mut writer);
        }

        writer.to_bytes()
    }

    pub fn read_snapshot_flag(reader: &mut BitReader) -> Result<bool, SyncStreamError> {
        bool::de(reader).map_err(SyncStreamError::truncated("payload snapshot flag"))
    }

    pub fn read_delta_flag(reader: &mut BitReader) -> Result<bool, SyncStreamError> {
        bool::de(reader).map_err(SyncStreamError::truncated("payload delta flag"))
    }
}
