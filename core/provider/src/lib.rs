//! Uniform LLM provider capability surface (spec §4.5).
//!
//! Concrete provider SDKs are out of scope for this core (spec §1); this
//! crate defines the `Provider` trait, a registry for dynamic dispatch by
//! id, and one no-network `PassthroughProvider` used by integration tests
//! and local development.

pub mod adapter;
pub mod error;
pub mod passthrough;
pub mod registry;
pub mod types;

pub use adapter::CompletionStream;
pub use adapter::Provider;
pub use adapter::ProviderConfig;
pub use error::ProviderError;
pub use passthrough::PASSTHROUGH_MODEL_ID;
pub use passthrough::PassthroughProvider;
pub use passthrough::passthrough_model;
pub use registry::ProviderRegistry;
pub use types::CompletionOptions;
pub use types::ConfigField;
pub use types::ModelDetails;
pub use types::ProviderStreamEvent;
pub use types::ToolSchema;
