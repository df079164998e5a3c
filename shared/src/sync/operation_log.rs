use std::slice;

use naia_serde::{BitReader, BitWrite, Serde};

use crate::types::{OpCount, MAX_PREALLOCATED_RECORDS};

use super::{error::SyncStreamError, operation::DictionaryOperation};

/// Ordered, append-only record of the mutations applied since the last flush
pub struct OperationLog<K, V> {
    operations: Vec<DictionaryOperation<K, V>>,
}

impl<K, V> OperationLog<K, V> {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    pub fn push(&mut self, operation: DictionaryOperation<K, V>) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Drops every recorded operation
    pub fn clear(&mut self) {
        self.operations.clear();
    }

    pub fn iter(&self) -> slice::Iter<'_, DictionaryOperation<K, V>> {
        self.operations.iter()
    }

    pub fn as_slice(&self) -> &[DictionaryOperation<K, V>] {
        &self.operations
    }
}

impl<K: Serde, V: Serde> OperationLog<K, V> {
    /// Writes the delta: operation count followed by every tagged operation
    pub fn write(&self, writer: &mut dyn BitWrite) {
        (self.operations.len() as OpCount).ser(writer);
        for operation in &self.operations {
            operation.write(writer);
        }
    }

    /// Reads a full delta batch. Either every operation is returned or none.
    pub fn read(reader: &mut BitReader) -> Result<Vec<DictionaryOperation<K, V>>, SyncStreamError> {
        let count = OpCount::de(reader).map_err(SyncStreamError::truncated("delta operation count"))?;

        let mut operations = Vec::with_capacity((count as usize).min(MAX_PREALLOCATED_RECORDS));
        for _ in 0..count {
            operations.push(DictionaryOperation::read(reader)?);
        }

        Ok(operations)
    }
}

impl<K, V> Default for OperationLog<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
