//! Fallback configuration generation for declarative gateway configs.
//!
//! A gateway that rejects some entities of a new configuration can keep
//! serving with a fallback: the rejected entities and everything connected
//! to them are removed and replaced with their last known good versions.

pub mod config;
pub mod declarative;
pub mod fallback;
pub mod graph;
pub mod observability;

pub use config::FallbackConfig;
pub use declarative::Content;
pub use fallback::{
    build_fallback_config, exclude_rejected_subgraphs, FallbackError, FallbackGenerator,
    FlatEntityError,
};
pub use graph::{
    build_config_graph, connected_components, render_graph_dot, to_flat_document, ConfigGraph,
    GraphError,
};
