//! Error types for stub file loading.

use thiserror::Error;

/// Stub file loading error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Stub file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    /// Path matched by the pattern could not be accessed
    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),
    /// Unknown file type
    #[error("Unknown file type: {0}")]
    UnknownFileType(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::error::Error;

    #[rstest]
    fn test_config_error_json_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = ConfigError::from(json_err);
        assert!(error.to_string().contains("JSON parsing error"));
        assert!(error.source().is_some());
    }

    #[rstest]
    fn test_config_error_yaml_display() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("invalid: yaml: [").unwrap_err();
        let error = ConfigError::from(yaml_err);
        assert!(error.to_string().contains("YAML parsing error"));
        assert!(matches!(error, ConfigError::Yaml(_)));
    }

    #[rstest]
    #[case("test.txt")]
    #[case("unknown.extension")]
    #[case("")]
    fn test_config_error_unknown_file_type_display(#[case] path: &str) {
        let error = ConfigError::UnknownFileType(path.to_string());
        let display = error.to_string();
        assert!(display.contains("Unknown file type"));
        assert!(display.contains(path));
        assert!(error.source().is_none());
    }

    #[rstest]
    fn test_config_error_io_display() {
        let error = ConfigError::Io {
            path: "stubs/missing.yaml".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(error.to_string().contains("stubs/missing.yaml"));
        assert!(error.source().is_some());
    }

    #[rstest]
    fn test_config_error_from_pattern() {
        let pattern_err = glob::Pattern::new("[").unwrap_err();
        let error: ConfigError = pattern_err.into();
        assert!(matches!(error, ConfigError::Pattern(_)));
    }
}
