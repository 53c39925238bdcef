//! In-memory event fan-out, composing with `relay-event-log` for durable
//! replay (spec §4.2).

pub mod bus;
pub mod error;

pub use bus::BusChannelInfo;
pub use bus::EventBus;
pub use bus::EventStream;
pub use error::EventBusError;
