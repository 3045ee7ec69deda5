//! core::config
//!
//! Configuration schema and loading.
//!
//! # Sources and precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Config file
//! 2. Environment overrides
//!
//! # Config file locations
//!
//! Searched in order:
//! 1. `$GIRDER_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/girder/config.toml`
//! 3. `~/.girder/config.toml` (canonical write location)
//!
//! # Environment overrides
//!
//! The same settings the original reporting plugin consumed as system
//! properties:
//! `JIRA_URL`, `JIRA_USERNAME`, `JIRA_PASSWORD`, `JIRA_PROJECT`,
//! `STRUCTURE_ID`.
//!
//! # Example
//!
//! ```no_run
//! use girder::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! let tracker = config.tracker().unwrap();
//! println!("tracker: {}", tracker.url);
//! ```

pub mod schema;

pub use schema::{ConfigFile, StructureSection, TrackerSection};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::StructureId;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

/// Fully resolved tracker settings, ready for client construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Tracker base URL.
    pub url: String,
    /// Basic-auth username, if authenticated access is configured.
    pub username: Option<String>,
    /// Basic-auth password or API token.
    pub password: Option<String>,
    /// Project key used to qualify bare numeric issue references.
    pub project: String,
    /// Explicit structure id; `None` selects the first available board.
    pub structure_id: Option<StructureId>,
}

/// Merged configuration from file and environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed config file (defaults when no file was found).
    pub file: ConfigFile,
    /// Path of the file that was loaded, if any.
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations and apply
    /// environment overrides.
    ///
    /// Missing config files are not an error (defaults are used); files
    /// that exist but cannot be parsed are.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_file()?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.file.validate()?;
        Ok(config)
    }

    /// Load the config file without environment overrides.
    fn load_file() -> Result<Self, ConfigError> {
        // 1. $GIRDER_CONFIG
        if let Ok(path) = std::env::var("GIRDER_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // 2. $XDG_CONFIG_HOME/girder/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("girder/config.toml");
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // 3. ~/.girder/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".girder/config.toml");
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Read and parse a specific config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Apply environment-style overrides from a lookup function.
    ///
    /// Taking the lookup as a closure keeps tests free of process-global
    /// environment mutation.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tracker = self.file.tracker.get_or_insert_with(Default::default);
        if let Some(url) = lookup("JIRA_URL") {
            tracker.url = Some(url);
        }
        if let Some(username) = lookup("JIRA_USERNAME") {
            tracker.username = Some(username);
        }
        if let Some(password) = lookup("JIRA_PASSWORD") {
            tracker.password = Some(password);
        }
        if let Some(project) = lookup("JIRA_PROJECT") {
            tracker.project = Some(project);
        }
        if let Some(raw) = lookup("STRUCTURE_ID") {
            let id = raw.parse::<i64>().map_err(|_| {
                ConfigError::InvalidValue(format!("STRUCTURE_ID '{}' is not an integer", raw))
            })?;
            self.file.structure.get_or_insert_with(Default::default).id = Some(id);
        }
        Ok(())
    }

    /// The path of the loaded config file, if one was found.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Resolve the tracker settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` when the tracker URL or project key
    /// is configured nowhere, and `ConfigError::InvalidValue` for a
    /// non-positive structure id.
    pub fn tracker(&self) -> Result<TrackerConfig, ConfigError> {
        let section = self.file.tracker.clone().unwrap_or_default();
        let url = section.url.ok_or(ConfigError::Missing("tracker.url"))?;
        let project = section
            .project
            .ok_or(ConfigError::Missing("tracker.project"))?;
        let structure_id = match self.file.structure.as_ref().and_then(|s| s.id) {
            Some(id) => Some(
                StructureId::new(id).map_err(|e| ConfigError::InvalidValue(e.to_string()))?,
            ),
            None => None,
        };
        Ok(TrackerConfig {
            url,
            username: section.username,
            password: section.password,
            project,
            structure_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_values_resolve() {
        let file = write_config(
            r#"
            [tracker]
            url = "https://jira.example.com"
            username = "reporter"
            password = "secret"
            project = "SHOP"

            [structure]
            id = 171
            "#,
        );
        let config = Config::from_file(file.path()).unwrap();
        let tracker = config.tracker().unwrap();
        assert_eq!(tracker.url, "https://jira.example.com");
        assert_eq!(tracker.username.as_deref(), Some("reporter"));
        assert_eq!(tracker.project, "SHOP");
        assert_eq!(tracker.structure_id, Some(StructureId::new(171).unwrap()));
    }

    #[test]
    fn env_overrides_win_over_file() {
        let file = write_config(
            r#"
            [tracker]
            url = "https://jira.example.com"
            project = "SHOP"
            "#,
        );
        let mut config = Config::from_file(file.path()).unwrap();
        config
            .apply_overrides(|name| match name {
                "JIRA_URL" => Some("https://jira.internal".to_string()),
                "STRUCTURE_ID" => Some("9".to_string()),
                _ => None,
            })
            .unwrap();
        let tracker = config.tracker().unwrap();
        assert_eq!(tracker.url, "https://jira.internal");
        assert_eq!(tracker.project, "SHOP");
        assert_eq!(tracker.structure_id, Some(StructureId::new(9).unwrap()));
    }

    #[test]
    fn overrides_apply_without_a_file() {
        let mut config = Config::default();
        config
            .apply_overrides(|name| match name {
                "JIRA_URL" => Some("https://jira.example.com".to_string()),
                "JIRA_PROJECT" => Some("SHOP".to_string()),
                _ => None,
            })
            .unwrap();
        let tracker = config.tracker().unwrap();
        assert_eq!(tracker.url, "https://jira.example.com");
        assert!(tracker.username.is_none());
        assert!(tracker.structure_id.is_none());
    }

    #[test]
    fn missing_url_is_reported() {
        let config = Config::default();
        assert!(matches!(
            config.tracker(),
            Err(ConfigError::Missing("tracker.url"))
        ));
    }

    #[test]
    fn missing_project_is_reported() {
        let mut config = Config::default();
        config
            .apply_overrides(|name| match name {
                "JIRA_URL" => Some("https://jira.example.com".to_string()),
                _ => None,
            })
            .unwrap();
        assert!(matches!(
            config.tracker(),
            Err(ConfigError::Missing("tracker.project"))
        ));
    }

    #[test]
    fn non_integer_structure_id_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(|name| match name {
            "STRUCTURE_ID" => Some("first".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let file = write_config("[tracker\nurl = 3");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
