//! Configuration loading and root folder resolution
//!
//! Two tiers feed every runtime value:
//! 1. Environment variables (highest priority for secrets)
//! 2. TOML config file (`madx.toml`)
//!
//! Missing config files are not fatal: a warning is logged and compiled
//! defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default Graph API base URL (API version pinned)
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com/v23.0";

/// Default chat completion endpoint base
pub const DEFAULT_ADVISOR_BASE_URL: &str = "https://api.openai.com/v1";

/// Default completion model
pub const DEFAULT_ADVISOR_MODEL: &str = "gpt-4";

/// Environment variable names
pub const ENV_ACCESS_TOKEN: &str = "META_ACCESS_TOKEN";
pub const ENV_PAGE_ID: &str = "META_PAGE_ID";
pub const ENV_ADVISOR_KEY: &str = "OPENAI_API_KEY";
pub const ENV_GRAPH_BASE_URL: &str = "MADX_GRAPH_BASE_URL";
pub const ENV_ROOT_FOLDER: &str = "MADX_ROOT_FOLDER";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder for the database and local state
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Explicit SQLite path; defaults to `<root_folder>/madx.db`
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub graph: GraphSection,

    #[serde(default)]
    pub advisor: AdvisorSection,

    #[serde(default)]
    pub refresher: RefresherSection,

    #[serde(default)]
    pub traversal: TraversalSection,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// `[graph]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSection {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub page_id: Option<String>,
    /// Total per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

/// `[advisor]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisorSection {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// `[refresher]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefresherSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between refreshes (first run happens after one interval)
    #[serde(default = "default_refresh_interval_secs")]
    pub interval_secs: u64,

    /// Fetch spend/ROAS insights during scheduled refreshes
    #[serde(default)]
    pub include_insights: bool,
}

impl Default for RefresherSection {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_refresh_interval_secs(),
            include_insights: false,
        }
    }
}

/// `[traversal]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalSection {
    /// Concurrent requests per tree level
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Overall deadline for one traversal; 0 disables it
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

impl Default for TraversalSection {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            deadline_secs: default_deadline_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_refresh_interval_secs() -> u64 {
    3600
}

fn default_concurrency() -> usize {
    4
}

fn default_deadline_secs() -> u64 {
    120
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Load the config file if it exists, otherwise fall back to defaults
///
/// A present but malformed file is still an error.
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    let candidate = match path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };

    match candidate {
        Some(p) if p.exists() => {
            let config = load_toml_config(&p)?;
            info!("Loaded configuration from {}", p.display());
            Ok(config)
        }
        Some(p) => {
            warn!("Config file {} not found, using defaults", p.display());
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Platform config file location: `<config_dir>/madx/madx.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("madx").join("madx.toml"))
}

/// Root folder resolution, in priority order:
/// 1. Command-line argument
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent default
pub fn resolve_root_folder(cli_arg: Option<&Path>, env_var_name: &str, toml: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("madx"))
        .unwrap_or_else(|| PathBuf::from("./madx_data"))
}

/// SQLite path: explicit TOML value, else `<root>/madx.db`
pub fn database_path(root_folder: &Path, toml: &TomlConfig) -> PathBuf {
    toml.database_path
        .clone()
        .unwrap_or_else(|| root_folder.join("madx.db"))
}

/// Validate a secret (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve a secret with ENV → TOML priority
///
/// Returns `None` when neither source holds a valid value.
pub fn resolve_secret(label: &str, env_var: &str, toml_value: Option<&str>) -> Option<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| is_valid_key(v));
    let toml_value = toml_value.filter(|v| is_valid_key(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment ({}) and TOML. Using environment (highest priority).",
            label, env_var
        );
    }

    if let Some(value) = env_value {
        info!("{} loaded from environment variable", label);
        return Some(value.trim().to_string());
    }

    if let Some(value) = toml_value {
        info!("{} loaded from TOML config", label);
        return Some(value.trim().to_string());
    }

    None
}
