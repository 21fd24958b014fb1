//! Configuration dependency graph.
//!
//! # Data Flow
//! ```text
//! Content (flat document)
//!     → builder.rs (vertices, then containment/reference edges)
//!     → ConfigGraph (keyed DAG, acyclic by construction)
//!     → components.rs (weakly connected components)
//!     → fallback::reconstructor (excise & recover)
//!     → flatten.rs (back to Content)
//!
//! Debugging:
//!     ConfigGraph → dot.rs → Graphviz file
//! ```
//!
//! # Design Decisions
//! - Vertices keyed by `type:name`; payloads owned by value
//! - Edges keep their direction and kind; traversal merges both directions
//! - Every operation is synchronous and works on graphs owned by the caller

pub mod builder;
pub mod components;
pub mod config_graph;
pub mod dot;
pub mod entity;
pub mod error;
pub mod flatten;

pub use builder::build_config_graph;
pub use components::{component_containing, connected_components, weak_component_keys};
pub use config_graph::{ConfigGraph, Edge, EdgeKind};
pub use dot::{render_graph_dot, to_dot, RenderError};
pub use entity::{Entity, EntityKey, EntityPayload, EntityType, RECOVERED_TAG};
pub use error::GraphError;
pub use flatten::to_flat_document;
