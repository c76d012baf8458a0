//! Engine configuration
//!
//! TOML-based configuration for the canonical disclaimer, the partial-match
//! heuristic and the verdict thresholds. `EngineConfig::default()` carries the
//! values required by law; a file only needs the keys it changes.
//!
//! ```toml
//! catalog_path = "catalog/regional.toml"
//!
//! [disclaimer]
//! partial_match_threshold = 2
//! min_size_percent = 7
//!
//! [verdict]
//! critical_violation_threshold = 5
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::verdict::CRITICAL_VIOLATION_THRESHOLD;

/// Mandatory disclaimer text (Federal Law No. 332-FZ amendments to art. 28.1)
pub const REQUIRED_DISCLAIMER: &str = "Банкротство влечет негативные последствия, в том числе ограничения на получение кредита \
и повторное банкротство в течение пяти лет. Предварительно обратитесь к своему кредитору и в МФЦ.";

/// Independently meaningful fragments of the disclaimer used for partial matches
pub const DISCLAIMER_KEY_PHRASES: [&str; 3] = [
    "банкротство влечет негативные последствия",
    "ограничения на получение кредита",
    "повторное банкротство в течение пяти лет",
];

/// Key phrases required for a partial match
pub const PARTIAL_MATCH_THRESHOLD: usize = 2;

/// Minimum disclaimer size, percent of material area
pub const MIN_DISCLAIMER_SIZE_PERCENT: u32 = 7;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Alternate pattern catalog; the builtin catalog when absent
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub disclaimer: DisclaimerConfig,
    #[serde(default)]
    pub verdict: VerdictConfig,
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_str(&content)?;

        // Catalog paths are relative to the config file
        if let (Some(catalog), Some(dir)) = (config.catalog_path.as_mut(), path.parent()) {
            if catalog.is_relative() {
                *catalog = dir.join(&*catalog);
            }
        }
        Ok(config)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the detectors cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        let disclaimer = &self.disclaimer;
        if disclaimer.text.trim().is_empty() {
            return Err(ConfigError::Invalid("disclaimer text is empty".into()));
        }
        if disclaimer.key_phrases.is_empty() {
            return Err(ConfigError::Invalid("disclaimer key phrase list is empty".into()));
        }
        let threshold = disclaimer.partial_match_threshold;
        if threshold == 0 || threshold > disclaimer.key_phrases.len() {
            return Err(ConfigError::Invalid(format!(
                "partial_match_threshold must be between 1 and {}, got {}",
                disclaimer.key_phrases.len(),
                threshold
            )));
        }

        let text_lower = disclaimer.text.to_lowercase();
        for phrase in &disclaimer.key_phrases {
            let phrase_lower = phrase.to_lowercase();
            if phrase_lower.trim().is_empty() || !text_lower.contains(&phrase_lower) {
                return Err(ConfigError::Invalid(format!(
                    "key phrase '{}' is not part of the disclaimer text",
                    phrase
                )));
            }
        }
        Ok(())
    }
}

/// Disclaimer detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisclaimerConfig {
    #[serde(default = "default_disclaimer_text")]
    pub text: String,
    #[serde(default = "default_key_phrases")]
    pub key_phrases: Vec<String>,
    #[serde(default = "default_partial_match_threshold")]
    pub partial_match_threshold: usize,
    /// Advisory only: quoted in remediation text, never measured
    #[serde(default = "default_min_size_percent")]
    pub min_size_percent: u32,
}

impl Default for DisclaimerConfig {
    fn default() -> Self {
        Self {
            text: default_disclaimer_text(),
            key_phrases: default_key_phrases(),
            partial_match_threshold: PARTIAL_MATCH_THRESHOLD,
            min_size_percent: MIN_DISCLAIMER_SIZE_PERCENT,
        }
    }
}

fn default_disclaimer_text() -> String {
    REQUIRED_DISCLAIMER.to_string()
}

fn default_key_phrases() -> Vec<String> {
    DISCLAIMER_KEY_PHRASES.iter().map(|p| p.to_string()).collect()
}

fn default_partial_match_threshold() -> usize {
    PARTIAL_MATCH_THRESHOLD
}

fn default_min_size_percent() -> u32 {
    MIN_DISCLAIMER_SIZE_PERCENT
}

/// Verdict thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictConfig {
    /// Violation counts above this are critical regardless of the disclaimer
    #[serde(default = "default_critical_violation_threshold")]
    pub critical_violation_threshold: usize,
}

impl Default for VerdictConfig {
    fn default() -> Self {
        Self {
            critical_violation_threshold: CRITICAL_VIOLATION_THRESHOLD,
        }
    }
}

fn default_critical_violation_threshold() -> usize {
    CRITICAL_VIOLATION_THRESHOLD
}
