//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::export::ExportVocabulary;
use crate::normalize::AliasTable;
use crate::resolve::DEFAULT_CUTOFF;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Unit name matching configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum similarity for an approximate match, in (0, 1]
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
}

fn default_cutoff() -> f64 {
    DEFAULT_CUTOFF
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where `generate` writes the sheet when `--out` is not given
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("cheat_sheet.html")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the YAML catalog
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub matching: MatchingConfig,

    /// Extra export name → catalog name aliases, merged over the built-ins
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    #[serde(default)]
    pub vocabulary: ExportVocabulary,

    #[serde(default)]
    pub output: OutputConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            matching: MatchingConfig::default(),
            aliases: BTreeMap::new(),
            vocabulary: ExportVocabulary::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cutoff = self.matching.cutoff;
        if !(cutoff > 0.0 && cutoff <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "Matching cutoff must be in (0, 1], got {}",
                cutoff
            )));
        }

        if self.vocabulary.formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one list format must be configured".to_string(),
            ));
        }

        if let Some((variant, _)) = self
            .aliases
            .iter()
            .find(|(k, v)| k.trim().is_empty() || v.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(format!(
                "Alias entries must not be empty (variant {:?})",
                variant
            )));
        }

        Ok(())
    }

    /// Built-in aliases with the configured ones layered on top.
    pub fn alias_table(&self) -> AliasTable {
        let mut table = AliasTable::builtin();
        for (variant, canonical) in &self.aliases {
            table.insert(variant, canonical);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.matching.cutoff, 0.72);
        assert_eq!(config.output.path, PathBuf::from("cheat_sheet.html"));
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_cutoff() {
        for cutoff in [0.0, -0.5, 1.5, f64::NAN] {
            let mut config = AppConfig::default();
            config.matching.cutoff = cutoff;
            assert!(config.validate().is_err(), "cutoff {} accepted", cutoff);
        }

        let mut config = AppConfig::default();
        config.matching.cutoff = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_no_formats() {
        let mut config = AppConfig::default();
        config.vocabulary.formats.clear();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_alias() {
        let mut config = AppConfig::default();
        config.aliases.insert("Rhinos".to_string(), " ".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file() {
        let toml_str = r#"
data_dir = "rules"

[matching]
cutoff = 0.8

[aliases]
"Heavy Intercessors" = "Heavy Intercessor Squad"

[vocabulary]
detachments = ["Unforgiven Task Force"]
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("rules"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.matching.cutoff, 0.8);
        assert_eq!(config.vocabulary.detachments, vec!["Unforgiven Task Force"]);
        assert!(!config.vocabulary.factions.is_empty());
        assert_eq!(
            config.alias_table().canonical_key("Heavy Intercessors"),
            "heavy intercessor squad"
        );
        // built-ins still present
        assert_eq!(
            config.alias_table().canonical_key("Intercessors"),
            "intercessor squad"
        );
    }

    #[test]
    fn test_from_file_and_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cheat-sheet.toml");

        let missing = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(missing.matching.cutoff, DEFAULT_CUTOFF);

        std::fs::write(&path, "[matching]\ncutoff = 2.0\n").unwrap();
        assert!(matches!(
            AppConfig::load_or_default(&path),
            Err(ConfigError::ValidationError(_))
        ));

        std::fs::write(&path, "log_level = [").unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.vocabulary, parsed.vocabulary);
    }
}
