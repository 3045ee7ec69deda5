//! core::config::schema
//!
//! Configuration file schema types.
//!
//! # File layout
//!
//! ```toml
//! [tracker]
//! url = "https://jira.example.com"
//! username = "reporter"
//! password = "secret"
//! project = "SHOP"
//!
//! [structure]
//! id = 171
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing: the tracker URL must be an absolute
//! http(s) URL and the structure id must be positive.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Root of the configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Tracker connection settings
    pub tracker: Option<TrackerSection>,

    /// Structure board selection
    pub structure: Option<StructureSection>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(tracker) = &self.tracker {
            tracker.validate()?;
        }
        if let Some(structure) = &self.structure {
            structure.validate()?;
        }
        Ok(())
    }
}

/// Tracker connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerSection {
    /// Base URL of the tracker (e.g. `https://jira.example.com`)
    pub url: Option<String>,

    /// Username for basic authentication
    pub username: Option<String>,

    /// Password or API token for basic authentication
    pub password: Option<String>,

    /// Project key used to qualify bare numeric issue references
    pub project: Option<String>,
}

impl TrackerSection {
    /// Validate the tracker settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url {
            validate_url(url)?;
        }
        if let Some(project) = &self.project {
            if project.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "project key cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Structure board selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StructureSection {
    /// Explicit structure id; unset means "first available"
    pub id: Option<i64>,
}

impl StructureSection {
    /// Validate the structure selection.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(id) = self.id {
            if id <= 0 {
                return Err(ConfigError::InvalidValue(format!(
                    "structure id must be positive, got {}",
                    id
                )));
            }
        }
        Ok(())
    }
}

/// Check that a tracker URL is absolute http(s).
pub(super) fn validate_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(format!(
            "tracker url '{}' must start with http:// or https://",
            url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_valid() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert!(config.tracker.is_none());
    }

    #[test]
    fn full_file_parses() {
        let config: ConfigFile = toml::from_str(
            r#"
            [tracker]
            url = "https://jira.example.com"
            username = "reporter"
            password = "secret"
            project = "SHOP"

            [structure]
            id = 171
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        let tracker = config.tracker.unwrap();
        assert_eq!(tracker.url.as_deref(), Some("https://jira.example.com"));
        assert_eq!(config.structure.unwrap().id, Some(171));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("[tracker]\nserver = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn non_http_url_is_rejected() {
        let config: ConfigFile = toml::from_str("[tracker]\nurl = \"jira.example.com\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn non_positive_structure_id_is_rejected() {
        let config: ConfigFile = toml::from_str("[structure]\nid = 0\n").unwrap();
        assert!(config.validate().is_err());
    }
}
