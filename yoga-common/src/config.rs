//! Configuration loading
//!
//! Config file resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. `YOGA_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/yoga/config.toml` on Linux)
//! 4. Compiled defaults (fallback)
//!
//! A missing config file is not an error: a warning is logged and the compiled
//! defaults are used. A file that exists but does not parse is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::grouping::GroupConfig;
use crate::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "YOGA_CONFIG";

/// Default listen address for the search service
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5730";

/// Default cap on results returned by one search
pub const DEFAULT_SEARCH_LIMIT: i64 = 50;

/// Section headers shown in search lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionLabels {
    pub mine: String,
    pub public: String,
    /// When unset, records that are neither mine nor public are hidden
    pub others: Option<String>,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            mine: "My Items".to_string(),
            public: "Public Items".to_string(),
            others: None,
        }
    }
}

/// Top-level TOML configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YogaConfig {
    pub database_path: PathBuf,
    pub bind_address: String,
    /// Seed/curator accounts whose records form the public section
    pub alpha_user_ids: Vec<String>,
    pub labels: SectionLabels,
    pub search_limit: i64,
}

impl Default for YogaConfig {
    fn default() -> Self {
        Self {
            database_path: default_data_dir().join("yoga.db"),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            alpha_user_ids: Vec::new(),
            labels: SectionLabels::default(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl YogaConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: YogaConfig =
            toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.labels.mine.trim().is_empty() || self.labels.public.trim().is_empty() {
            return Err(Error::Config("labels.mine and labels.public must not be empty".into()));
        }
        if self.search_limit < 1 {
            return Err(Error::Config(format!(
                "search_limit must be at least 1 (got {})",
                self.search_limit
            )));
        }
        Ok(())
    }

    /// Grouping settings for one caller
    pub fn group_config(&self, user_id: Option<String>, user_email: Option<String>) -> GroupConfig {
        let mut config = GroupConfig::new(self.labels.mine.clone(), self.labels.public.clone())
            .with_current_user(user_id, user_email)
            .with_alpha_users(self.alpha_user_ids.iter().cloned());
        if let Some(others) = &self.labels.others {
            config = config.with_others_label(others.clone());
        }
        config
    }
}

/// Find the config file, highest priority first. Returns `None` when no
/// source names one and no platform file exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    dirs::config_dir()
        .map(|d| d.join("yoga").join("config.toml"))
        .filter(|p| p.exists())
}

/// Resolve and load the configuration, falling back to defaults when no file
/// is found.
pub fn load_config(cli_arg: Option<&Path>) -> Result<YogaConfig> {
    match resolve_config_path(cli_arg) {
        Some(path) if path.exists() => {
            info!("Loading config from {}", path.display());
            YogaConfig::load(&path)
        }
        Some(path) => {
            warn!("Config file {} not found, using defaults", path.display());
            Ok(YogaConfig::default())
        }
        None => {
            warn!("No config file found, using defaults");
            Ok(YogaConfig::default())
        }
    }
}

/// OS-dependent default data directory
fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/yoga (or /var/lib/yoga for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("yoga"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/yoga"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("yoga"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/yoga"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("yoga"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\yoga"))
    } else {
        PathBuf::from("./yoga_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = YogaConfig::default();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.search_limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(config.labels.mine, "My Items");
        assert!(config.labels.others.is_none());
        assert!(config.database_path.ends_with("yoga.db"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = YogaConfig::from_toml_str(
            r#"
            alpha_user_ids = ["seed-1", "seed-2"]

            [labels]
            others = "Community"
            "#,
        )
        .unwrap();

        assert_eq!(config.alpha_user_ids, vec!["seed-1", "seed-2"]);
        assert_eq!(config.labels.mine, "My Items");
        assert_eq!(config.labels.others.as_deref(), Some("Community"));
        assert_eq!(config.search_limit, DEFAULT_SEARCH_LIMIT);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            YogaConfig::from_toml_str("search_limit = 0"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            YogaConfig::from_toml_str("[labels]\nmine = \"  \""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            YogaConfig::from_toml_str("search_limit = \"many\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_group_config() {
        let config = YogaConfig {
            alpha_user_ids: vec!["seed".into()],
            labels: SectionLabels {
                mine: "Mine".into(),
                public: "Curated".into(),
                others: Some("Community".into()),
            },
            ..Default::default()
        };

        let group = config.group_config(Some("u1".into()), None);
        assert_eq!(group.my_label, "Mine");
        assert_eq!(group.public_label, "Curated");
        assert_eq!(group.others_label.as_deref(), Some("Community"));
        assert_eq!(group.alpha_user_ids, vec!["seed"]);
        assert_eq!(group.current_user_id.as_deref(), Some("u1"));
    }
}
