//! `tracing-subscriber` setup, invoked once by the `relay-server` binary.
//!
//! Library crates never call [`init_tracing`] themselves — they only emit
//! `tracing::{debug,info,warn,error}` — so that embedding this workspace in
//! a larger process never fights over the global subscriber.

use serde::Deserialize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Which timezone log timestamps are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimezoneConfig {
    /// The host's local timezone.
    #[default]
    Local,
    /// UTC.
    Utc,
}

/// Logging configuration, loaded as part of `AIConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Include the file:line of each log call.
    pub location: bool,
    /// Include the tracing target (module path) of each log call.
    pub target: bool,
    /// Timezone used to render timestamps.
    pub timezone: TimezoneConfig,
    /// Default level filter, e.g. `"info"`.
    pub level: String,
    /// Per-module overrides, e.g. `"relay_streaming=debug"`.
    pub modules: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            location: false,
            target: false,
            timezone: TimezoneConfig::Local,
            level: "info".to_string(),
            modules: Vec::new(),
        }
    }
}

/// A `FormatTime` implementation honoring [`TimezoneConfig`].
pub struct ConfigurableTimer {
    timezone: TimezoneConfig,
}

impl ConfigurableTimer {
    pub fn new(timezone: TimezoneConfig) -> Self {
        Self { timezone }
    }
}

impl FormatTime for ConfigurableTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        match self.timezone {
            TimezoneConfig::Utc => write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            TimezoneConfig::Local => {
                let local: chrono::DateTime<chrono::Local> = now.into();
                write!(w, "{}", local.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
            }
        }
    }
}

/// Builds an `EnvFilter` from `logging`, falling back to `default_level`
/// when `RUST_LOG` is unset and `logging.level` is empty.
pub fn build_env_filter(logging: &LoggingConfig, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let base = if logging.level.is_empty() {
        default_level
    } else {
        logging.level.as_str()
    };
    let mut directive = base.to_string();
    for module in &logging.modules {
        directive.push(',');
        directive.push_str(module);
    }
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initializes the global `tracing` subscriber. Call exactly once, from the
/// server binary's `main`.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = build_env_filter(logging, "info");
    let timer = ConfigurableTimer::new(logging.timezone);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(logging.location)
        .with_line_number(logging.location)
        .with_target(logging.target)
        .with_timer(timer);
    if let Err(err) = subscriber.try_init() {
        eprintln!("tracing subscriber already initialized: {err}");
    }
}

#[cfg(test)]
#[path = "logging.test.rs"]
mod tests;
