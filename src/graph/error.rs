//! Graph error definitions.

use thiserror::Error;

use crate::graph::entity::{EntityKey, EntityType};

/// Errors raised while building, traversing or flattening a configuration graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// An entity lacks the field that provides its identity.
    #[error("{entity_type} entity is missing required field `{field}`")]
    MissingField {
        entity_type: EntityType,
        field: &'static str,
    },

    /// Adding the edge would close a cycle.
    #[error("edge {from} -> {to} would create a cycle")]
    CycleDetected { from: EntityKey, to: EntityKey },

    /// An operation referenced a vertex that is not in the graph.
    #[error("vertex {key} not found during {operation}")]
    VertexNotFound {
        key: EntityKey,
        operation: &'static str,
    },

    /// Two declarations share a key but carry different attributes.
    #[error("conflicting declarations of {key}")]
    ConflictingDuplicate { key: EntityKey },

    /// Entity type string outside the fixed enumeration.
    #[error("unknown entity type `{0}`")]
    UnknownEntityType(String),

    /// A vertex payload does not belong to the vertex's entity type.
    #[error("payload of {key} is a {found}, not a {expected}")]
    PayloadMismatch {
        key: EntityKey,
        expected: EntityType,
        found: EntityType,
    },
}
