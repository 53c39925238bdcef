//! Summarizes an existing session into a new one, preserving a
//! transitional user message (spec §4.10).

pub mod error;
pub mod service;
pub mod transcript;

pub use error::CompactionError;
pub use service::CompactionResult;
pub use service::CompactionService;
