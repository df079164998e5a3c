use std::fmt;

use naia_serde::{BitReader, BitWrite, Serde};

use super::error::SyncStreamError;

/// Wire tag preceding every operation in a delta
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperationKind {
    Add = 0,
    Clear = 1,
    Remove = 2,
    Set = 3,
}

impl OperationKind {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Add),
            1 => Some(Self::Clear),
            2 => Some(Self::Remove),
            3 => Some(Self::Set),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "Add",
            Self::Clear => "Clear",
            Self::Remove => "Remove",
            Self::Set => "Set",
        };
        f.write_str(name)
    }
}

/// A single mutation recorded by an authoritative collection
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DictionaryOperation<K, V> {
    Add(K, V),
    Set(K, V),
    /// Carries the removed value so replay never has to look it up
    Remove(K, V),
    Clear,
}

impl<K: Serde, V: Serde> DictionaryOperation<K, V> {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Add(..) => OperationKind::Add,
            Self::Set(..) => OperationKind::Set,
            Self::Remove(..) => OperationKind::Remove,
            Self::Clear => OperationKind::Clear,
        }
    }

    /// Writes the tag followed by the key/value payload, if any
    pub fn write(&self, writer: &mut dyn BitWrite) {
        self.kind().tag().ser(writer);
        match self {
            Self::Add(key, value) | Self::Set(key, value) | Self::Remove(key, value) => {
                key.ser(writer);
                value.ser(writer);
            }
            Self::Clear => {}
        }
    }

    /// Reads one complete operation. Nothing is returned unless the whole
    /// record, payload included, was present and valid.
    pub fn read(reader: &mut BitReader) -> Result<Self, SyncStreamError> {
        let tag = u8::de(reader).map_err(SyncStreamError::truncated("operation tag"))?;
        let Some(kind) = OperationKind::from_tag(tag) else {
            return Err(SyncStreamError::UnknownOperation { tag });
        };

        if kind == OperationKind::Clear {
            return Ok(Self::Clear);
        }

        let key = K::de(reader).map_err(SyncStreamError::truncated("operation key"))?;
        let value = V::de(reader).map_err(SyncStreamError::truncated("operation value"))?;

        Ok(match kind {
            OperationKind::Add => Self::Add(key, value),
            OperationKind::Set => Self::Set(key, value),
            OperationKind::Remove => Self::Remove(key, value),
            OperationKind::Clear => Self::Clear,
        })
    }

    pub fn bit_length(&self) -> u32 {
        let payload = match self {
            Self::Add(key, value) | Self::Set(key, value) | Self::Remove(key, value) => {
                key.bit_length() + value.bit_length()
            }
            Self::Clear => 0,
        };
        8 + payload
    }
}
