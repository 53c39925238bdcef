//! Model catalog types: capabilities, reasoning, and unified specs.

mod model_info;
mod model_spec;
mod reasoning;

pub use model_info::Capability;
pub use model_info::CapabilitySet;
pub use model_info::ModelInfo;
pub use model_info::ModelStatus;
pub use model_info::Pricing;
pub use model_info::ReasoningSupport;
pub use model_spec::ModelSpec;
pub use model_spec::ModelSpecParseError;
pub use model_spec::resolve_provider_type;
pub use reasoning::ReasoningEffort;
pub use reasoning::ReasoningSummary;
pub use reasoning::effort_rank;
pub use reasoning::nearest_effort;
