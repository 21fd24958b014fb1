//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the fallback tool.
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct FallbackConfig {
    /// Fallback generation behaviour.
    pub fallback: FallbackSettings,

    /// Graph dump settings.
    pub diagnostics: DiagnosticsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Fallback generation behaviour.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FallbackSettings {
    /// Generate fallback configurations at all.
    pub enabled: bool,

    /// Backfill excised subgraphs from the last known good configuration.
    /// When false, rejected subgraphs are only removed.
    pub recover_from_last_good: bool,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            recover_from_last_good: true,
        }
    }
}

/// Graph dump settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Write a DOT rendering of every generated fallback graph.
    pub dump_graphs: bool,

    /// Directory for dumps. A temporary file is used when unset.
    pub output_dir: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
