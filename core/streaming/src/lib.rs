//! The Streaming Engine (spec §4.8): the one core component that drives an
//! assistant turn end-to-end, coordinating the Session Store, Context
//! Assembler, Model/Provider Registries, Tool Executor, Trigger Layer, and
//! Event Bus.

pub mod engine;
pub mod error;
pub mod events;
pub mod fallback;
pub mod locks;
pub mod title;
pub mod tokens;

pub use engine::StreamingEngine;
pub use engine::TriggerStreamInput;
pub use engine::TriggerStreamOutput;
pub use error::StreamingError;
pub use fallback::FallbackTarget;
pub use locks::StreamGuard;
pub use locks::StreamLocks;
