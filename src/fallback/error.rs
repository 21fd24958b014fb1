//! Fallback error definitions.

use thiserror::Error;

use crate::graph::{GraphError, RenderError};

/// Errors raised while generating a fallback configuration.
#[derive(Debug, Error)]
pub enum FallbackError {
    /// Invoked with nothing to recover from. Caller bug, not retried.
    #[error("rejected entity list is empty, nothing to recover from")]
    EmptyRejectionList,

    /// Fallback generation is switched off in configuration.
    #[error("fallback configuration is disabled")]
    Disabled,

    /// A rejection string was not of the form `type:name`.
    #[error("malformed rejection `{0}`, expected type:name")]
    MalformedRejection(String),

    /// Graph construction or traversal failed; no partial result is returned.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Diagnostics dump failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl FallbackError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            FallbackError::EmptyRejectionList => "empty_rejection_list",
            FallbackError::Disabled => "disabled",
            FallbackError::MalformedRejection(_) => "malformed_rejection",
            FallbackError::Graph(GraphError::VertexNotFound { .. }) => "vertex_not_found",
            FallbackError::Graph(GraphError::CycleDetected { .. }) => "cycle_detected",
            FallbackError::Graph(GraphError::ConflictingDuplicate { .. }) => "conflicting_duplicate",
            FallbackError::Graph(_) => "graph_build",
            FallbackError::Render(_) => "render",
        }
    }
}
