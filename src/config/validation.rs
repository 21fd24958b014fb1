//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the log level is one the filter understands
//! - Check the dump directory is usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FallbackConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::path::Path;

use crate::config::schema::FallbackConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub fn validate_config(config: &FallbackConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError {
            field: "observability.log_level",
            message: format!(
                "unknown level `{}`, expected one of {}",
                config.observability.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if let Some(dir) = &config.diagnostics.output_dir {
        if dir.trim().is_empty() {
            errors.push(ValidationError {
                field: "diagnostics.output_dir",
                message: "must not be empty".to_string(),
            });
        } else if Path::new(dir).is_file() {
            errors.push(ValidationError {
                field: "diagnostics.output_dir",
                message: format!("`{}` is a file, expected a directory", dir),
            });
        }
    }

    if config.diagnostics.output_dir.is_some() && !config.diagnostics.dump_graphs {
        tracing::warn!("diagnostics.output_dir is set but dump_graphs is disabled");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&FallbackConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_all_errors() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = FallbackConfig::default();
        config.observability.log_level = "verbose".to_string();
        config.diagnostics.output_dir = Some(file.path().display().to_string());

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["observability.log_level", "diagnostics.output_dir"]);
    }

    #[test]
    fn test_level_is_case_insensitive() {
        let mut config = FallbackConfig::default();
        config.observability.log_level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_output_dir() {
        let mut config = FallbackConfig::default();
        config.diagnostics.output_dir = Some("  ".to_string());
        assert!(validate_config(&config).is_err());
    }
}
