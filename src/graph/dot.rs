//! Graphviz rendering for operator debugging.
//!
//! Not part of the functional contract: output is meant for humans.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use petgraph::dot::{Config, Dot};
use thiserror::Error;

use crate::graph::config_graph::ConfigGraph;
use crate::graph::entity::{Entity, EntityType};

pub const CA_CERT_COLOR: &str = "brown";
pub const SERVICE_COLOR: &str = "coral";
pub const ROUTE_COLOR: &str = "darkkhaki";
pub const CERTIFICATE_COLOR: &str = "deepskyblue";
pub const UPSTREAM_COLOR: &str = "darkolivegreen";
pub const TARGET_COLOR: &str = "goldenrod";
pub const CONSUMER_COLOR: &str = "hotpink";
pub const PLUGIN_COLOR: &str = "indianred";
pub const RECOVERED_COLOR: &str = "lime";

/// Errors raised while writing a DOT file.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write dot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to keep temp file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Fill color for a vertex.
pub fn node_color(entity: &Entity) -> &'static str {
    if entity.recovered {
        return RECOVERED_COLOR;
    }
    match entity.entity_type {
        EntityType::CaCertificate => CA_CERT_COLOR,
        EntityType::Service => SERVICE_COLOR,
        EntityType::Route => ROUTE_COLOR,
        EntityType::Certificate | EntityType::Sni => CERTIFICATE_COLOR,
        EntityType::Upstream => UPSTREAM_COLOR,
        EntityType::Target => TARGET_COLOR,
        EntityType::Consumer => CONSUMER_COLOR,
        EntityType::Plugin => PLUGIN_COLOR,
    }
}

/// DOT description of `g`.
pub fn to_dot(g: &ConfigGraph) -> String {
    let dot = Dot::with_attr_getters(
        g.inner(),
        &[Config::EdgeNoLabel],
        &|_, _| String::new(),
        &|_, (_, entity)| format!("style=filled fillcolor={}", node_color(entity)),
    );
    dot.to_string()
}

/// Write the DOT description of `g` to `path`, or to a kept temporary `.dot`
/// file when no path is given. Returns the path written.
pub fn render_graph_dot(g: &ConfigGraph, path: Option<&Path>) -> Result<PathBuf, RenderError> {
    let dot = to_dot(g);
    let written = match path {
        Some(path) => {
            fs::write(path, dot)?;
            path.to_path_buf()
        }
        None => {
            let mut file = tempfile::Builder::new()
                .prefix("config-graph-")
                .suffix(".dot")
                .tempfile()?;
            file.write_all(dot.as_bytes())?;
            let (_, path) = file.keep()?;
            path
        }
    };

    tracing::debug!(path = %written.display(), vertices = g.vertex_count(), "Graph rendered");
    Ok(written)
}
