//! End-to-end fallback generation.
//!
//! # Responsibilities
//! - Build graphs from the last known good and current documents
//! - Reconstruct, flatten, and optionally dump the result as DOT
//! - Report every outcome to the injected observer
//!
//! # Design Decisions
//! - Telemetry goes through `FallbackObserver`; nothing global is touched
//!   unless the observer does so
//! - Settings are copied in at construction and never change afterwards

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{DiagnosticsConfig, FallbackSettings};
use crate::declarative::Content;
use crate::fallback::error::FallbackError;
use crate::fallback::reconstructor::reconstruct;
use crate::fallback::rejection::FlatEntityError;
use crate::graph::{
    build_config_graph, render_graph_dot, to_flat_document, ConfigGraph, EntityKey, RenderError,
};
use crate::observability::metrics;

const DUMP_FILE: &str = "fallback.dot";

/// What a generation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackSummary {
    pub excised: Vec<EntityKey>,
    pub recovered: Vec<EntityKey>,
    /// Where the DOT dump was written, when diagnostics are on.
    pub dump_path: Option<PathBuf>,
}

/// A generated fallback configuration.
#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    pub document: Content,
    pub graph: ConfigGraph,
    pub summary: FallbackSummary,
}

/// Receives the result of every generation attempt.
pub trait FallbackObserver: Send + Sync {
    fn fallback_generated(&self, summary: &FallbackSummary);
    fn fallback_failed(&self, error: &FallbackError);
}

/// Logs through `tracing` and records the `gateway_fallback_*` counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FallbackObserver for TracingObserver {
    fn fallback_generated(&self, summary: &FallbackSummary) {
        tracing::info!(
            excised = summary.excised.len(),
            recovered = summary.recovered.len(),
            dump = ?summary.dump_path,
            "Fallback configuration generated"
        );
        metrics::record_fallback_generated(summary.excised.len(), summary.recovered.len());
    }

    fn fallback_failed(&self, error: &FallbackError) {
        match error {
            FallbackError::Disabled => tracing::warn!("Fallback generation requested while disabled"),
            _ => tracing::error!(error = %error, reason = error.reason(), "Fallback generation failed"),
        }
        metrics::record_fallback_failure(error.reason());
    }
}

/// Turns rejected entity reports into a corrected declarative document.
pub struct FallbackGenerator<O = TracingObserver> {
    settings: FallbackSettings,
    diagnostics: DiagnosticsConfig,
    observer: O,
}

impl FallbackGenerator<TracingObserver> {
    pub fn new(settings: FallbackSettings, diagnostics: DiagnosticsConfig) -> Self {
        Self::with_observer(settings, diagnostics, TracingObserver)
    }
}

impl<O: FallbackObserver> FallbackGenerator<O> {
    pub fn with_observer(
        settings: FallbackSettings,
        diagnostics: DiagnosticsConfig,
        observer: O,
    ) -> Self {
        Self {
            settings,
            diagnostics,
            observer,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Generate from declarative documents.
    pub fn generate(
        &self,
        last_good: &Content,
        current: &Content,
        rejected: &[FlatEntityError],
    ) -> Result<FallbackOutcome, FallbackError> {
        let result = self.check_enabled().and_then(|_| {
            let current = build_config_graph(current)?;
            let last_good = if self.settings.recover_from_last_good {
                Some(build_config_graph(last_good)?)
            } else {
                None
            };
            self.run(last_good.as_ref(), &current, rejected)
        });
        self.notify(result)
    }

    /// Generate from graphs the caller already built.
    pub fn generate_from_graphs(
        &self,
        last_good: &ConfigGraph,
        current: &ConfigGraph,
        rejected: &[FlatEntityError],
    ) -> Result<FallbackOutcome, FallbackError> {
        let result = self.check_enabled().and_then(|_| {
            let last_good = self.settings.recover_from_last_good.then_some(last_good);
            self.run(last_good, current, rejected)
        });
        self.notify(result)
    }

    fn check_enabled(&self) -> Result<(), FallbackError> {
        if self.settings.enabled {
            Ok(())
        } else {
            Err(FallbackError::Disabled)
        }
    }

    fn run(
        &self,
        last_good: Option<&ConfigGraph>,
        current: &ConfigGraph,
        rejected: &[FlatEntityError],
    ) -> Result<FallbackOutcome, FallbackError> {
        let reconstruction = reconstruct(last_good, current, rejected)?;
        let document = to_flat_document(&reconstruction.graph)?;

        let dump_path = if self.diagnostics.dump_graphs {
            Some(self.dump(&reconstruction.graph)?)
        } else {
            None
        };

        Ok(FallbackOutcome {
            document,
            graph: reconstruction.graph,
            summary: FallbackSummary {
                excised: reconstruction.excised,
                recovered: reconstruction.recovered,
                dump_path,
            },
        })
    }

    fn dump(&self, graph: &ConfigGraph) -> Result<PathBuf, RenderError> {
        match &self.diagnostics.output_dir {
            Some(dir) => {
                let dir = Path::new(dir);
                fs::create_dir_all(dir)?;
                render_graph_dot(graph, Some(&dir.join(DUMP_FILE)))
            }
            None => render_graph_dot(graph, None),
        }
    }

    fn notify(
        &self,
        result: Result<FallbackOutcome, FallbackError>,
    ) -> Result<FallbackOutcome, FallbackError> {
        match &result {
            Ok(outcome) => self.observer.fallback_generated(&outcome.summary),
            Err(error) => self.observer.fallback_failed(error),
        }
        result
    }
}
