//! Configuration file loading and startup validation.

use echoguard::{Config, ConfigError, DetectionConfig, DuplicateDetector, ValidationError};
use std::io::Write;

#[test]
fn full_config_file_round_trips() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[detection]
duplication_threshold = 4
window_minutes = 10
timeout_secs = 120
exempt_authors = [42]
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.detection.duplication_threshold, 4);
    assert_eq!(config.detection.window_minutes, 10);
    assert_eq!(config.detection.timeout_secs, 120);
    assert_eq!(config.detection.exempt_authors, vec![42]);

    // A loaded config builds a working detector.
    assert!(DuplicateDetector::<u64>::new(config.detection).is_ok());
}

#[test]
fn empty_file_yields_defaults() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.detection.duplication_threshold, 3);
    assert_eq!(config.detection.window_minutes, 5);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Config::load("/nonexistent/echoguard.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[detection\nduplication_threshold = ").unwrap();

    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn invalid_settings_are_rejected_at_construction_not_at_runtime() {
    let config = DetectionConfig {
        duplication_threshold: 0,
        ..DetectionConfig::default()
    };
    assert_eq!(
        DuplicateDetector::<u64>::new(config).unwrap_err(),
        ValidationError::ThresholdNotPositive
    );
}
