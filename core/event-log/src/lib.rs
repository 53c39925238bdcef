//! Append-only, per-channel event storage (spec §4.1).
//!
//! The event bus (`relay-event-bus`) composes with this crate for durable
//! replay; this crate has no opinion about fan-out or live subscribers.

pub mod error;
pub mod store;

pub use error::EventLogError;
pub use store::ChannelInfo;
pub use store::EventLog;
pub use store::InMemoryEventLog;
pub use store::JsonlEventLog;
