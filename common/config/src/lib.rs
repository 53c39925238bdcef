//! The server's single configuration document (spec §6 "Configuration").
//!
//! `AiConfig` is loaded from `~/.relay/config.json` (overridable via
//! `RELAY_HOME`) at process start and on demand, parsed leniently (jsonc,
//! so hand-edited files can carry comments), and saved atomically: write to
//! a sibling temp file, `fsync`, rename over the target.
//!
//! Credential storage is out of scope for this core (spec §1); values
//! round-trip exactly as given, encryption is the caller's responsibility.

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::CONFIG_FILE;
pub use loader::DEFAULT_CONFIG_DIR;
pub use loader::RELAY_HOME_ENV;
pub use loader::config_dir;
pub use loader::load;
pub use loader::save;
pub use types::AiConfig;
pub use types::ProviderConfig;
