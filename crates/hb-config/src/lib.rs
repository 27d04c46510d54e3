//! Build configuration for HB.
//!
//! Parses the build's TOML configuration with serde. CLI arguments are
//! applied after loading via [`CliSettings`], so flags take precedence over
//! config file values.
//!
//! Only the options consumed by the crates in this workspace are modeled
//! here; the host owns the rest of its configuration surface.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// `--devhelp-activate`: toggle devhelp index generation.
    pub devhelp_activate: Option<bool>,
    /// `--project-name`: override the project name.
    pub project_name: Option<String>,
    /// `--project-version`: override the project version.
    pub project_version: Option<String>,
    /// `--incremental`: override the incremental build flag.
    pub incremental: Option<bool>,
}

/// Build configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name; part of every devhelp output name.
    pub project_name: Option<String>,
    /// Optional project version; part of the output name when set.
    pub project_version: Option<String>,
    /// True for incremental builds (previous output is reused).
    pub incremental: bool,
    /// Devhelp extension options.
    pub devhelp: DevhelpSection,
}

/// The `[devhelp]` configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DevhelpSection {
    /// Enable devhelp index generation.
    pub activate: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from a TOML file with optional CLI settings.
    ///
    /// CLI settings are applied after parsing, then the result is
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be parsed, or
    /// fails validation.
    pub fn load(path: &Path, cli_settings: Option<&CliSettings>) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    pub fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(activate) = settings.devhelp_activate {
            self.devhelp.activate = activate;
        }
        if let Some(name) = &settings.project_name {
            self.project_name = Some(name.clone());
        }
        if let Some(version) = &settings.project_version {
            self.project_version = Some(version.clone());
        }
        if let Some(incremental) = settings.incremental {
            self.incremental = incremental;
        }
    }

    /// Project name, required when the devhelp extension is activated.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the name is unset or empty.
    pub fn require_project_name(&self) -> Result<&str, ConfigError> {
        self.project_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                ConfigError::Validation(
                    "project_name is required when the devhelp extension is activated".to_owned(),
                )
            })
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if devhelp generation is activated
    /// without a project name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.devhelp.activate {
            self.require_project_name()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.project_name.is_none());
        assert!(config.project_version.is_none());
        assert!(!config.incremental);
        assert!(!config.devhelp.activate);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.project_name.is_none());
        assert!(!config.devhelp.activate);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
project_name = "myproj"
project_version = "1.0"
incremental = true

[devhelp]
activate = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.project_name.as_deref(), Some("myproj"));
        assert_eq!(config.project_version.as_deref(), Some("1.0"));
        assert!(config.incremental);
        assert!(config.devhelp.activate);
    }

    #[test]
    fn test_apply_cli_settings_activate() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            devhelp_activate: Some(true),
            ..Default::default()
        });
        assert!(config.devhelp.activate);
    }

    #[test]
    fn test_apply_cli_settings_project_name() {
        let mut config = Config {
            project_name: Some("from-file".to_owned()),
            ..Default::default()
        };
        config.apply_cli_settings(&CliSettings {
            project_name: Some("from-cli".to_owned()),
            ..Default::default()
        });
        assert_eq!(config.project_name.as_deref(), Some("from-cli"));
    }

    #[test]
    fn test_apply_cli_settings_empty_changes_nothing() {
        let mut config = Config {
            project_name: Some("myproj".to_owned()),
            incremental: true,
            ..Default::default()
        };
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.project_name.as_deref(), Some("myproj"));
        assert!(config.incremental);
        assert!(!config.devhelp.activate);
    }

    #[test]
    fn test_validate_activated_without_project_name() {
        let config = Config {
            devhelp: DevhelpSection { activate: true },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("project_name"));
    }

    #[test]
    fn test_validate_activated_with_empty_project_name() {
        let config = Config {
            project_name: Some(String::new()),
            devhelp: DevhelpSection { activate: true },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_activated_with_project_name() {
        let config = Config {
            project_name: Some("myproj".to_owned()),
            devhelp: DevhelpSection { activate: true },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_deactivated_without_project_name() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/hb.toml"), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_with_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hb.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "project_name = \"myproj\"").unwrap();

        let settings = CliSettings {
            devhelp_activate: Some(true),
            ..Default::default()
        };
        let config = Config::load(&path, Some(&settings)).unwrap();

        assert_eq!(config.project_name.as_deref(), Some("myproj"));
        assert!(config.devhelp.activate);
    }

    #[test]
    fn test_load_validates_after_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hb.toml");
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            devhelp_activate: Some(true),
            ..Default::default()
        };
        let result = Config::load(&path, Some(&settings));

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hb.toml");
        std::fs::write(&path, "project_name = [not toml").unwrap();

        let result = Config::load(&path, None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
