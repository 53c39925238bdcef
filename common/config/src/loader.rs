//! Locating and reading the configuration file from disk.

use std::path::Path;
use std::path::PathBuf;

use jsonc_parser::ParseOptions;
use snafu::ResultExt;
use tracing::debug;

use crate::error::ConfigError;
use crate::error::InvalidJsonSnafu;
use crate::error::ParseSnafu;
use crate::error::ReadSnafu;
use crate::error::WriteSnafu;
use crate::types::AiConfig;

/// Default configuration directory name, relative to the home directory.
pub const DEFAULT_CONFIG_DIR: &str = ".relay";

/// Configuration file name within the config directory.
pub const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the config directory.
pub const RELAY_HOME_ENV: &str = "RELAY_HOME";

/// Resolve the config directory: `$RELAY_HOME` if set, else `~/.relay`.
pub fn config_dir() -> PathBuf {
    if let Ok(custom_home) = std::env::var(RELAY_HOME_ENV) {
        let path = PathBuf::from(&custom_home);
        if path.is_absolute() {
            return path;
        }
        return std::env::current_dir()
            .map(|cwd| cwd.join(&custom_home))
            .unwrap_or_else(|_| PathBuf::from(custom_home));
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_CONFIG_DIR)
}

/// Reads and parses the configuration file at `config_dir/config.json`.
///
/// Accepts JSON with `//` and `/* */` comments (jsonc), since hand-edited
/// config files benefit from them. Returns the default (empty) config if
/// the file doesn't exist yet.
pub fn load(config_dir: &Path) -> Result<AiConfig, ConfigError> {
    let path = config_dir.join(CONFIG_FILE);
    if !path.exists() {
        debug!(path = %path.display(), "no config file found, using defaults");
        return Ok(AiConfig::default());
    }

    let raw = std::fs::read_to_string(&path).with_context(|_| ReadSnafu {
        path: path.display().to_string(),
    })?;

    let value = jsonc_parser::parse_to_serde_value(&raw, &ParseOptions::default())
        .map_err(|e| serde_json::Error::io(std::io::Error::other(e.to_string())))
        .with_context(|_| InvalidJsonSnafu {
            path: path.display().to_string(),
        })?
        .unwrap_or(serde_json::Value::Null);

    serde_path_to_error::deserialize(&value).map_err(|err| {
        let field_path = err.path().to_string();
        let source = err.into_inner();
        ParseSnafu {
            path: path.display().to_string(),
            message: format!("{field_path}: {source}"),
        }
        .build()
    })
}

/// Writes `config` atomically to `config_dir/config.json`: serialize to a
/// sibling temp file, `fsync` it, then rename over the target so a reader
/// never observes a partially-written file.
pub fn save(config_dir: &Path, config: &AiConfig) -> Result<(), ConfigError> {
    std::fs::create_dir_all(config_dir).with_context(|_| WriteSnafu {
        path: config_dir.display().to_string(),
    })?;
    let path = config_dir.join(CONFIG_FILE);
    let tmp_path = config_dir.join(format!("{CONFIG_FILE}.tmp"));

    let json = serde_json::to_string_pretty(config).with_context(|_| InvalidJsonSnafu {
        path: path.display().to_string(),
    })?;

    let write = || -> std::io::Result<()> {
        let mut file = std::fs::File::create(&tmp_path)?;
        std::io::Write::write_all(&mut file, json.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    };
    write().with_context(|_| WriteSnafu {
        path: path.display().to_string(),
    })
}

#[cfg(test)]
#[path = "loader.test.rs"]
mod tests;
