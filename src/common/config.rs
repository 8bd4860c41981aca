use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::duplicates::cluster::DEFAULT_SIMILARITY;

/// Global imgcompare configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Similarity percentage (0-100); the match threshold is `100 - similarity`
    #[serde(default = "default_similarity")]
    pub similarity: f64,

    /// File extensions treated as images (case-insensitive, no dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Descend into sub-folders
    #[serde(default)]
    pub recursive: bool,

    /// Extract fingerprints on a thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

fn default_similarity() -> f64 {
    DEFAULT_SIMILARITY
}
fn default_extensions() -> Vec<String> {
    vec!["png".to_string(), "jpg".to_string()]
}
fn default_parallel() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            similarity: default_similarity(),
            extensions: default_extensions(),
            recursive: false,
            parallel: default_parallel(),
            output_format: OutputFormat::Human,
        }
    }
}

impl Config {
    /// Get the imgcompare data directory (~/.imgcompare)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".imgcompare")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Load config from file, or fall back to defaults if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Apply a `key = value` pair coming from the command line
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "similarity" => {
                let similarity: f64 = value.parse()?;
                if !(0.0..=100.0).contains(&similarity) {
                    anyhow::bail!("similarity must be between 0 and 100");
                }
                self.similarity = similarity;
            }
            "extensions" => {
                self.extensions = value
                    .split(',')
                    .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect();
            }
            "recursive" => self.recursive = value.parse()?,
            "parallel" => self.parallel = value.parse()?,
            "output_format" => {
                self.output_format = match value {
                    "human" => OutputFormat::Human,
                    "json" => OutputFormat::Json,
                    "quiet" => OutputFormat::Quiet,
                    _ => anyhow::bail!("Unknown output format: {}", value),
                }
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }
}
