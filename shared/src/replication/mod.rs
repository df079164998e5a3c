pub mod broadcaster;
pub mod error;
pub mod payload;
pub mod receiver;
