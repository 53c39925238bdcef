//! Small, dependency-light utilities shared by every crate — nothing here
//! should need anything beyond `chrono`/`tracing`/`serde`.

pub mod elapsed;
pub mod logging;

pub use elapsed::format_duration;
pub use elapsed::format_elapsed;
pub use logging::LoggingConfig;
pub use logging::TimezoneConfig;
pub use logging::init_tracing;
