/// Construction-time settings of a `SyncDictionary`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncDictionaryConfig {
    /// Entries reserved in the backing storage up front
    pub initial_capacity: usize,
    /// Emit a warning when the unflushed Operation Log reaches this many
    /// operations. `None` disables the warning.
    pub pending_warning_threshold: Option<usize>,
}

impl Default for SyncDictionaryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            pending_warning_threshold: Some(1024),
        }
    }
}
