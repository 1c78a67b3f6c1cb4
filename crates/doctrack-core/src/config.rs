//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/doctrack/config.toml)
//! 3. Environment variables (DOCTRACK_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::stats::DEFAULT_RECENT_LIMIT;

/// Environment variable prefix
const ENV_PREFIX: &str = "DOCTRACK";

/// How the CLI hands share notifications to the outside world
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Append each delivery to a JSON-lines outbox file
    #[default]
    Outbox,
    /// Open a mailto: or wa.me link with the desktop handler
    Link,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Outbox => f.write_str("outbox"),
            DeliveryMode::Link => f.write_str("link"),
        }
    }
}

impl FromStr for DeliveryMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outbox" => Ok(DeliveryMode::Outbox),
            "link" => Ok(DeliveryMode::Link),
            other => bail!("Unknown delivery mode '{}'. Use 'outbox' or 'link'.", other),
        }
    }
}

/// Delivery settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default)]
    pub mode: DeliveryMode,

    /// Outbox file (defaults to `<data_dir>/outbox.jsonl`)
    #[serde(default)]
    pub outbox: Option<PathBuf>,
}

/// Login settings; leaving `username` unset disables the login requirement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub username: Option<String>,

    /// argon2 PHC string (`doctrack hash-password` prints one)
    #[serde(default)]
    pub password_hash: Option<String>,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (document snapshot, session, outbox)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Write logs here instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Length of the `recent` listing
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    #[serde(default)]
    pub delivery: DeliveryConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_file: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            delivery: DeliveryConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (DOCTRACK_DATA_DIR, DOCTRACK_LOG_FILE, DOCTRACK_DELIVERY)
    /// 2. Config file (~/.config/doctrack/config.toml or DOCTRACK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load from a path given on the command line, or the default location
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // DOCTRACK_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // DOCTRACK_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        // DOCTRACK_DELIVERY
        if let Ok(val) = std::env::var(format!("{}_DELIVERY", ENV_PREFIX)) {
            self.delivery.mode = val
                .parse()
                .with_context(|| format!("Invalid {}_DELIVERY value", ENV_PREFIX))?;
        }

        Ok(())
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with DOCTRACK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("doctrack")
            .join("config.toml")
    }

    /// Get the path to the document snapshot
    pub fn documents_path(&self) -> PathBuf {
        self.data_dir.join("documents.json")
    }

    /// Get the path to the saved login session
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Get the path to the delivery outbox
    pub fn outbox_path(&self) -> PathBuf {
        self.delivery
            .outbox
            .clone()
            .unwrap_or_else(|| self.data_dir.join("outbox.jsonl"))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("doctrack")
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &["DOCTRACK_DATA_DIR", "DOCTRACK_LOG_FILE", "DOCTRACK_DELIVERY"];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.recent_limit, 5);
        assert_eq!(config.delivery.mode, DeliveryMode::Outbox);
        assert!(config.auth.username.is_none());
        assert!(config.data_dir.ends_with("doctrack"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            data_dir: PathBuf::from("/data/doctrack"),
            ..Config::default()
        };

        assert_eq!(
            config.documents_path(),
            PathBuf::from("/data/doctrack/documents.json")
        );
        assert!(config.session_path().ends_with("session.json"));
        assert!(config.outbox_path().ends_with("outbox.jsonl"));

        let custom = Config {
            delivery: DeliveryConfig {
                mode: DeliveryMode::Outbox,
                outbox: Some(PathBuf::from("/tmp/mail.jsonl")),
            },
            ..config
        };
        assert_eq!(custom.outbox_path(), PathBuf::from("/tmp/mail.jsonl"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("DOCTRACK_DATA_DIR", "/tmp/doctrack-test");
        config.apply_env_overrides().unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/doctrack-test"));
    }

    #[test]
    fn test_env_override_delivery() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("DOCTRACK_DELIVERY", "LINK");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.delivery.mode, DeliveryMode::Link);

        env::set_var("DOCTRACK_DELIVERY", "pigeon");
        assert!(config.apply_env_overrides().is_err());
    }

    #[test]
    fn test_env_override_log_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("DOCTRACK_LOG_FILE", "/tmp/doctrack.log");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/doctrack.log")));

        // Empty string clears it
        env::set_var("DOCTRACK_LOG_FILE", "");
        config.apply_env_overrides().unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            recent_limit = 10

            [delivery]
            mode = "link"

            [auth]
            username = "admin"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.recent_limit, 10);
        assert_eq!(config.delivery.mode, DeliveryMode::Link);
        assert_eq!(config.auth.username.as_deref(), Some("admin"));
        assert!(config.auth.password_hash.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            recent_limit: 3,
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.recent_limit, 3);
        assert!(loaded.data_dir.exists());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("DOCTRACK_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Should return defaults when file doesn't exist
        assert_eq!(config.recent_limit, 5);
        assert_eq!(config.delivery.mode, DeliveryMode::Outbox);
    }
}
