pub mod config;
pub mod dictionary_codec;
pub mod error;
pub mod listener;
pub mod operation;
pub mod operation_log;
pub mod storage;
pub mod sync_dictionary;
pub mod sync_object;
