//! Tool registry and executor (spec §4.6).
//!
//! Concrete tool implementations (filesystem, shell, search) are out of
//! scope for this core (spec §1); this crate defines the `Tool` trait the
//! registry dispatches to, argument validation, and timed execution.

pub mod context;
pub mod error;
pub mod executor;
pub mod registry;
pub mod tool;

#[cfg(test)]
pub mod test_support;

pub use context::ToolContext;
pub use context::ToolProgress;
pub use error::ToolError;
pub use executor::ToolExecutor;
pub use registry::ToolRegistry;
pub use tool::Tool;
