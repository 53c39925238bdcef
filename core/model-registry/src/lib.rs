//! Static provider/model catalog and capability queries (spec §4.4).

pub mod error;
pub mod registry;

pub use error::ModelRegistryError;
pub use registry::CapabilityCacheKey;
pub use registry::ModelFamily;
pub use registry::ModelRegistry;
pub use registry::ProviderEntry;
