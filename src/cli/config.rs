//! TOML configuration file support.
//!
//! Every field is optional; command-line flags override the file, which
//! overrides the built-in defaults:
//!
//! ```toml
//! # wheatstone.toml
//! [backend]
//! base_url = "http://rig.local:5000"
//! poll_interval_ms = 500
//! poll_timeout_ms = 2000
//! command_timeout_ms = 10000
//!
//! [session]
//! excitation = "2.0"
//! auto_interval = "0.5"
//! export_dir = "measurements"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use wheatstone::client::BackendConfig;
use wheatstone::session::SessionConfig;

/// Root configuration structure for wheatstone.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendSection,

    /// Measurement session defaults.
    #[serde(default)]
    pub session: SessionSection,
}

/// `[backend]` table.
#[derive(Debug, Default, Deserialize)]
pub struct BackendSection {
    /// Backend base URL.
    pub base_url: Option<String>,

    /// Status polling period in milliseconds.
    pub poll_interval_ms: Option<u64>,

    /// Timeout for one status request in milliseconds.
    pub poll_timeout_ms: Option<u64>,

    /// Timeout for commands in milliseconds (none by default).
    pub command_timeout_ms: Option<u64>,

    /// User agent sent with every request.
    pub user_agent: Option<String>,
}

/// `[session]` table.
#[derive(Debug, Default, Deserialize)]
pub struct SessionSection {
    /// Initial excitation voltage.
    pub excitation: Option<String>,

    /// Initial auto-record interval in seconds.
    pub auto_interval: Option<String>,

    /// Directory for CSV exports.
    pub export_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path` if given, otherwise start from defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Backend settings: defaults overlaid with the file.
    pub fn backend_config(&self) -> BackendConfig {
        let file = &self.backend;
        let mut config = match &file.base_url {
            Some(url) => BackendConfig::new(url.clone()),
            None => BackendConfig::default(),
        };
        if let Some(ms) = file.poll_interval_ms {
            config = config.poll_interval_ms(ms);
        }
        if let Some(ms) = file.poll_timeout_ms {
            config = config.poll_timeout_ms(ms);
        }
        if let Some(ms) = file.command_timeout_ms {
            config = config.command_timeout_ms(ms);
        }
        if let Some(agent) = &file.user_agent {
            config.user_agent = agent.clone();
        }
        config
    }

    /// Session settings: defaults overlaid with the file.
    pub fn session_config(&self) -> SessionConfig {
        let file = &self.session;
        let mut config = SessionConfig::default();
        if let Some(excitation) = &file.excitation {
            config = config.with_excitation(excitation.clone());
        }
        if let Some(interval) = &file.auto_interval {
            config = config.with_auto_interval(interval.clone());
        }
        if let Some(dir) = &file.export_dir {
            config = config.with_export_dir(dir.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [backend]
            base_url = "http://rig.local:5000"
            poll_interval_ms = 250
            command_timeout_ms = 10000

            [session]
            excitation = "5"
            export_dir = "out"
        "#;

        let config = Config::from_str(toml).unwrap();
        let backend = config.backend_config();
        assert_eq!(backend.base_url, "http://rig.local:5000");
        assert_eq!(backend.poll_interval, Duration::from_millis(250));
        assert_eq!(backend.poll_timeout, Duration::from_secs(2));
        assert_eq!(backend.command_timeout, Some(Duration::from_secs(10)));

        let session = config.session_config();
        assert_eq!(session.excitation, "5");
        assert_eq!(session.auto_interval, "1.0");
        assert_eq!(session.export_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.backend_config(), BackendConfig::default());
        assert_eq!(config.session_config(), SessionConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_str("[session]\nauto_interval = \"0.5\"\n").unwrap();
        assert_eq!(config.session_config().auto_interval, "0.5");
        assert_eq!(config.backend_config(), BackendConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_str("[backend\nbase_url = 1").is_err());
        assert!(Config::from_str("[backend]\npoll_interval_ms = \"fast\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wheatstone.toml");
        std::fs::write(&path, "[backend]\nbase_url = \"https://lab:8443\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.backend_config().base_url, "https://lab:8443");
        assert!(Config::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
