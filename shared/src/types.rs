/// Wire type of entry and operation counts
pub type OpCount = u32;

// Upper bound on storage reserved up front from a count read off the wire
pub(crate) const MAX_PREALLOCATED_RECORDS: usize = 1024;

/// Which side of the replication link an instance lives on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncRole {
    /// Source of truth; mutable, records an Operation Log
    Authoritative,
    /// Read-only copy maintained by snapshots and deltas
    Mirror,
}

impl SyncRole {
    pub fn is_mirror(self) -> bool {
        self == SyncRole::Mirror
    }
}
