//! Configuration loading
//!
//! Bootstrap configuration comes from a TOML file. Resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Everything here is read once at startup; there is no runtime reload.

use crate::artifacts::ArtifactPaths;
use crate::currency::DEFAULT_CURRENCY_SYMBOL;
use crate::features::DEFAULT_REFERENCE_YEAR;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "CARPRICE_CONFIG";

/// Earliest manufacture year the form offers
pub const DEFAULT_MIN_YEAR: i32 = 1990;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// HTTP listen address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    #[serde(default)]
    pub prediction: PredictionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            artifacts: ArtifactsConfig::default(),
            prediction: PredictionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where the three startup artifacts live
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ArtifactsConfig {
    /// Base directory; relative file names below resolve against it
    #[serde(default = "default_artifacts_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_model_file")]
    pub model: PathBuf,

    #[serde(default = "default_company_encoder_file")]
    pub company_encoder: PathBuf,

    #[serde(default = "default_fuel_type_encoder_file")]
    pub fuel_type_encoder: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
            model: default_model_file(),
            company_encoder: default_company_encoder_file(),
            fuel_type_encoder: default_fuel_type_encoder_file(),
        }
    }
}

impl ArtifactsConfig {
    /// Resolve file names against `dir` (absolute names are kept as-is)
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.dir.join(&self.model),
            company_encoder: self.dir.join(&self.company_encoder),
            fuel_type_encoder: self.dir.join(&self.fuel_type_encoder),
        }
    }
}

/// Prediction settings as written in the TOML file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PredictionConfig {
    /// Year vehicle age is computed against
    ///
    /// Unset: use the model artifact's `reference_year`, then 2023.
    #[serde(default)]
    pub reference_year: Option<i32>,

    #[serde(default = "default_min_year")]
    pub min_year: i32,

    /// Unset: same as the effective reference year
    #[serde(default)]
    pub max_year: Option<i32>,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            reference_year: None,
            min_year: default_min_year(),
            max_year: None,
            currency_symbol: default_currency_symbol(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:5780".to_string()
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}

fn default_model_file() -> PathBuf {
    PathBuf::from("model.json")
}

fn default_company_encoder_file() -> PathBuf {
    PathBuf::from("company_encoder.json")
}

fn default_fuel_type_encoder_file() -> PathBuf {
    PathBuf::from("fuel_type_encoder.json")
}

fn default_min_year() -> i32 {
    DEFAULT_MIN_YEAR
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where the config file path came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line or in the environment; must exist
    Explicit(PathBuf),
    /// Platform config directory; may be absent
    Default(PathBuf),
    /// No candidate location at all
    None,
}

/// Pick the config file following the priority order above
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> ConfigSource {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return ConfigSource::Explicit(PathBuf::from(path));
        }
    }

    // Priority 3: ~/.config/carprice/config.toml (platform equivalent elsewhere)
    match dirs::config_dir() {
        Some(dir) => ConfigSource::Default(dir.join("carprice").join("config.toml")),
        None => ConfigSource::None,
    }
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a resolved source
    ///
    /// A missing default file falls back to compiled defaults. A missing
    /// explicit file, or any file that fails to parse, is an error. Runs
    /// before logging is initialised, so callers report the outcome.
    pub fn from_source(source: &ConfigSource) -> Result<Self> {
        match source {
            ConfigSource::Explicit(path) => Self::load(path),
            ConfigSource::Default(path) if path.exists() => Self::load(path),
            ConfigSource::Default(_) | ConfigSource::None => Ok(Self::default()),
        }
    }

    /// Apply command-line / environment overrides on top of the file
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(addr) = &overrides.bind_addr {
            self.bind_addr = addr.clone();
        }
        if let Some(dir) = &overrides.artifacts_dir {
            self.artifacts.dir = dir.clone();
        }
        if let Some(year) = overrides.reference_year {
            self.prediction.reference_year = Some(year);
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_addr: Option<String>,
    pub artifacts_dir: Option<PathBuf>,
    pub reference_year: Option<i32>,
}

/// Effective prediction settings after consulting the model artifact
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSettings {
    pub reference_year: i32,
    pub min_year: i32,
    pub max_year: i32,
    pub currency_symbol: String,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_REFERENCE_YEAR,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl PredictionSettings {
    /// Reference year priority: config > model artifact > 2023
    pub fn resolve(config: &PredictionConfig, model_reference_year: Option<i32>) -> Result<Self> {
        let reference_year = match (config.reference_year, model_reference_year) {
            (Some(configured), Some(trained)) if configured != trained => {
                warn!(
                    "Configured reference year {} differs from the model's {}; ages will not match training",
                    configured, trained
                );
                configured
            }
            (Some(configured), _) => configured,
            (None, Some(trained)) => trained,
            (None, None) => {
                warn!(
                    "Neither config nor model names a reference year; using {}",
                    DEFAULT_REFERENCE_YEAR
                );
                DEFAULT_REFERENCE_YEAR
            }
        };

        let max_year = config.max_year.unwrap_or(reference_year);
        if config.min_year > max_year {
            return Err(Error::Config(format!(
                "min_year {} is after max_year {}",
                config.min_year, max_year
            )));
        }

        Ok(Self {
            reference_year,
            min_year: config.min_year,
            max_year,
            currency_symbol: config.currency_symbol.clone(),
        })
    }

    pub fn year_in_range(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}
