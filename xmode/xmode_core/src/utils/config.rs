//! Configuration for xmode
//!
//! Handles loading and validating configuration from TOML files.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::utils::logging::LogLevel;

/// An account name qualified by its authority, e.g. `NT AUTHORITY\SYSTEM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalName {
    /// Account name
    pub name: String,

    /// Domain or authority the account belongs to
    #[serde(default)]
    pub domain: String,
}

impl PrincipalName {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }

    /// Case-insensitive comparison against a resolved account.
    pub fn matches(&self, name: &str, domain: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) && self.domain.eq_ignore_ascii_case(domain)
    }
}

fn default_other_principal() -> String {
    "Users".to_string()
}

fn default_system_principal() -> PrincipalName {
    PrincipalName::new("SYSTEM", "NT AUTHORITY")
}

/// xmode configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmodeConfig {
    /// Account whose identity stands in for the "other" subject on ACL
    /// platforms
    #[serde(default = "default_other_principal")]
    pub other_principal: String,

    /// Privileged principal whose entries are preserved on write and never
    /// attributed to a subject on read
    #[serde(default = "default_system_principal")]
    pub system_principal: PrincipalName,

    /// Whether recursive application follows symbolic links
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Log level for the command-line front end
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for XmodeConfig {
    fn default() -> Self {
        Self {
            other_principal: default_other_principal(),
            system_principal: default_system_principal(),
            follow_symlinks: false,
            log_level: LogLevel::default(),
        }
    }
}

impl XmodeConfig {
    /// Load configuration from a file
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());

                if !path.exists() {
                    warn!("Configuration file not found: {}", path.display());
                    return Ok(Self::default());
                }

                let content = fs::read_to_string(path).map_err(|e| {
                    ConfigError::LoadFailed(format!("{}: {}", path.display(), e))
                })?;

                Self::from_toml(&content)?
            }
            None => {
                info!("No configuration file specified, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.other_principal.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "other_principal cannot be empty".to_string(),
            ));
        }

        if self.system_principal.name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "system_principal.name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
other_principal = "Authenticated Users"
follow_symlinks = true
log_level = "debug"

[system_principal]
name = "SYSTEM"
domain = "NT AUTHORITY"
"#
        )
        .unwrap();

        let config = XmodeConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.other_principal, "Authenticated Users");
        assert!(config.follow_symlinks);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.system_principal.matches("system", "nt authority"));
    }

    #[test]
    fn test_defaults() {
        let config = XmodeConfig::load(None).unwrap();
        assert_eq!(config, XmodeConfig::default());
        assert_eq!(config.other_principal, "Users");
        assert!(!config.follow_symlinks);

        let partial = XmodeConfig::from_toml("follow_symlinks = true").unwrap();
        assert_eq!(partial.other_principal, "Users");
        assert_eq!(partial.log_level, LogLevel::Warning);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = XmodeConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, XmodeConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            XmodeConfig::from_toml("follow_symlinks = \"sometimes\""),
            Err(ConfigError::ParseFailed(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "other_principal = \"\"").unwrap();
        assert!(matches!(
            XmodeConfig::load(Some(file.path())),
            Err(ConfigError::Invalid(_))
        ));
    }
}
