//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.querydesk/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::staging::DEFAULT_ACCEPTED_EXTENSIONS;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QueryDeskConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub files: FilesConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub suppress_empty_queries: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FilesConfig {
    pub accepted_extensions: Option<Vec<String>>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub suppress_empty_queries: bool,
    /// Lowercase, without leading dots.
    pub accepted_extensions: Vec<String>,
}

/// Values that came from the command line (None = flag not given).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.querydesk/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".querydesk").join("config.toml"))
}

/// Load config from `~/.querydesk/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `QueryDeskConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<QueryDeskConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(QueryDeskConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<QueryDeskConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(QueryDeskConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: QueryDeskConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# QueryDesk Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# suppress_empty_queries = false     # true: Enter on a blank draft does nothing

# [backend]
# base_url = "http://localhost:5000" # Or set QUERYDESK_BASE_URL env var
# timeout_secs = 60                  # Or set QUERYDESK_TIMEOUT_SECS env var

# [files]
# accepted_extensions = ["pdf", "doc", "docx"]
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &QueryDeskConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], with the environment lookup injected.
pub(crate) fn resolve_with_env(
    config: &QueryDeskConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("QUERYDESK_BASE_URL"))
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Timeout: CLI → env → config → default
    let timeout_secs = cli
        .timeout_secs
        .or_else(|| {
            env("QUERYDESK_TIMEOUT_SECS").and_then(|v| match v.parse() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    warn!("Ignoring invalid QUERYDESK_TIMEOUT_SECS={:?}", v);
                    None
                }
            })
        })
        .or(config.backend.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let accepted_extensions = config
        .files
        .accepted_extensions
        .clone()
        .unwrap_or_else(|| DEFAULT_ACCEPTED_EXTENSIONS.iter().map(|s| s.to_string()).collect())
        .into_iter()
        .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();

    ResolvedConfig {
        base_url,
        timeout_secs,
        suppress_empty_queries: config.general.suppress_empty_queries.unwrap_or(false),
        accepted_extensions,
    }
}
