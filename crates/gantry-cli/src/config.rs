//! CLI configuration management.

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Distro IDs that build variants may run on.
    #[serde(default)]
    pub distros: Vec<String>,
    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,
    /// Treat warnings as failures.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl CliConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file, falling back to defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("ci", "gantry", "gantry-cli")
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.yaml"))
    }

    /// Set a configuration value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "distros" => {
                self.distros = value
                    .split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(String::from)
                    .collect();
            }
            "output_format" => {
                self.output_format = match value {
                    "table" => OutputFormat::Table,
                    "json" => OutputFormat::Json,
                    "yaml" => OutputFormat::Yaml,
                    _ => bail!("Invalid output format: {}", value),
                };
            }
            "strict" => {
                self.strict = value
                    .parse()
                    .map_err(|_| anyhow!("Invalid value for strict: {}", value))?;
            }
            _ => bail!("Unknown config key: {}", key),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_values() {
        let mut config = CliConfig::default();
        config.set("distros", "rhel55, ubuntu1604,").unwrap();
        config.set("output_format", "json").unwrap();
        config.set("strict", "true").unwrap();

        assert_eq!(config.distros, vec!["rhel55", "ubuntu1604"]);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.strict);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = CliConfig::default();
        assert!(config.set("output_format", "xml").is_err());
        assert!(config.set("strict", "maybe").is_err());
        assert!(config.set("api_url", "http://localhost").is_err());
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        assert_eq!(CliConfig::load_from(&path).unwrap(), CliConfig::default());

        let config = CliConfig {
            distros: vec!["rhel55".to_string()],
            output_format: OutputFormat::Yaml,
            strict: true,
        };
        config.save_to(&path).unwrap();
        assert_eq!(CliConfig::load_from(&path).unwrap(), config);
    }
}
