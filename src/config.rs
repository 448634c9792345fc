//! Configuration loading and validation.
//!
//! Detection knobs live under a `[detection]` table in a TOML file.
//! Every field has a serde default so a partial (or empty) file is
//! valid; positivity of the threshold and window is checked when the
//! detector is constructed, not at message time.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::detector::AuthorId;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Validation errors for detection settings.
///
/// Raised at detector construction so a misconfigured engine never
/// starts processing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("detection.duplication_threshold must be a positive integer")]
    ThresholdNotPositive,
    #[error("detection.window_minutes must be a positive integer")]
    WindowNotPositive,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Duplicate detection settings.
    #[serde(default)]
    pub detection: DetectionConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Duplicate detection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Occurrence count (including the incoming message) at which a
    /// repeated message or URL is classified as spam (default: 3).
    #[serde(default = "default_duplication_threshold")]
    pub duplication_threshold: u32,
    /// Sliding window length in minutes for both the per-author and the
    /// global URL history (default: 5).
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,
    /// Timeout duration in seconds handed to the moderation backend
    /// when an author trips the content rule (default: 600).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Author ids exempt from all duplicate detection. Their messages
    /// are neither checked nor recorded. Use sparingly - intended for
    /// moderators and trusted bots.
    #[serde(default)]
    pub exempt_authors: Vec<AuthorId>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            duplication_threshold: default_duplication_threshold(),
            window_minutes: default_window_minutes(),
            timeout_secs: default_timeout_secs(),
            exempt_authors: Vec::new(),
        }
    }
}

impl DetectionConfig {
    /// Check that the threshold and window are usable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duplication_threshold == 0 {
            return Err(ValidationError::ThresholdNotPositive);
        }
        if self.window_minutes == 0 {
            return Err(ValidationError::WindowNotPositive);
        }
        Ok(())
    }
}

fn default_duplication_threshold() -> u32 {
    3
}

fn default_window_minutes() -> u32 {
    5
}

fn default_timeout_secs() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_duplication_threshold_value() {
        assert_eq!(default_duplication_threshold(), 3);
    }

    #[test]
    fn default_window_minutes_value() {
        assert_eq!(default_window_minutes(), 5);
    }

    #[test]
    fn default_timeout_secs_value() {
        assert_eq!(default_timeout_secs(), 600);
    }

    #[test]
    fn detection_config_defaults() {
        let config = DetectionConfig::default();
        assert_eq!(config.duplication_threshold, 3);
        assert_eq!(config.window_minutes, 5);
        assert_eq!(config.timeout_secs, 600);
        assert!(config.exempt_authors.is_empty());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.detection.duplication_threshold, 3);
        assert_eq!(config.detection.window_minutes, 5);
    }

    #[test]
    fn partial_detection_table_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
[detection]
duplication_threshold = 2
"#,
        )
        .unwrap();
        assert_eq!(config.detection.duplication_threshold, 2);
        assert_eq!(config.detection.window_minutes, 5);
    }

    #[test]
    fn exempt_authors_parse() {
        let config: Config = toml::from_str(
            r#"
[detection]
exempt_authors = [42, 1337]
"#,
        )
        .unwrap();
        assert_eq!(config.detection.exempt_authors, vec![42, 1337]);
    }

    #[test]
    fn zero_threshold_fails_validation() {
        let config = DetectionConfig {
            duplication_threshold: 0,
            ..DetectionConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::ThresholdNotPositive));
    }

    #[test]
    fn zero_window_fails_validation() {
        let config = DetectionConfig {
            window_minutes: 0,
            ..DetectionConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::WindowNotPositive));
    }

    #[test]
    fn default_config_validates() {
        assert!(DetectionConfig::default().validate().is_ok());
    }
}
