//! Configuration types for kube-api-lint.

use crate::linters::config_dto::LintersDto;
use crate::linters::{loader, LintersConfig, LoadError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level configuration, validated.
///
/// Construct with [`Config::parse`] or [`Config::from_file`]; every
/// `[linters]` setting has been checked by the time either returns.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "strict", "minimal").
    pub preset: Option<String>,

    /// Analyzer configuration.
    pub analyzer: AnalyzerConfig,

    /// Per-rule switches, keyed by rule name.
    pub rules: HashMap<String, RuleConfig>,

    /// Settings of the configurable rules.
    pub linters: LintersConfig,
}

/// Raw TOML document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigDto {
    #[serde(default)]
    preset: Option<String>,
    #[serde(default)]
    analyzer: AnalyzerConfig,
    #[serde(default)]
    rules: HashMap<String, RuleConfig>,
    #[serde(default)]
    linters: LintersDto,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a setting fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let dto: ConfigDto = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        for pattern in &dto.analyzer.exclude {
            glob::Pattern::new(pattern).map_err(|e| ConfigError::InvalidExclude {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(Self {
            preset: dto.preset,
            analyzer: dto.analyzer,
            rules: dto.rules,
            linters: loader::load(dto.linters)?,
        })
    }

    /// Checks if a rule is enabled. Rules are enabled unless switched off.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Glob patterns over declaration file paths to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether declarations are evaluated on a thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            parallel: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Configuration errors. Any of these aborts the run before analysis.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A `[linters]` setting failed validation.
    #[error("Invalid linter settings: {0}")]
    Linters(#[from] LoadError),

    /// An exclude pattern is not a valid glob.
    #[error("Invalid exclude pattern {pattern:?}: {message}")]
    InvalidExclude {
        /// The pattern.
        pattern: String,
        /// Glob error message.
        message: String,
    },

    /// The preset name is not known.
    #[error("Unknown preset {name:?}, expected one of: {expected}")]
    UnknownPreset {
        /// The configured name.
        name: String,
        /// Known preset names.
        expected: String,
    },
}
