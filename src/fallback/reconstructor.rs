//! Excise-and-recover fallback reconstruction.
//!
//! # Responsibilities
//! - Remove the whole weakly connected subgraph of every rejected entity
//! - Restore the matching subgraph from the last known good graph, tagged
//!   as recovered
//!
//! # Design Decisions
//! - Works on a private clone of `current`; neither input is mutated
//! - Any traversal or mutation failure aborts the reconstruction, so a graph
//!   that received only part of the planned change is never returned
//! - A rejected entity with no last known good version is removed without
//!   replacement
//! - Vertices already in the fallback graph are kept as they are: they were
//!   not reachable from a rejected entity in `current`

use std::collections::BTreeSet;

use crate::fallback::error::FallbackError;
use crate::fallback::rejection::FlatEntityError;
use crate::graph::{weak_component_keys, ConfigGraph, EdgeKind, EntityKey, GraphError};

/// Result of a reconstruction, with the keys it touched.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub graph: ConfigGraph,
    /// Keys removed from `current`, sorted.
    pub excised: Vec<EntityKey>,
    /// Keys restored from the last known good graph, sorted.
    pub recovered: Vec<EntityKey>,
}

/// Build a fallback graph: excise every rejected entity's subgraph from
/// `current` and backfill it from `last_good`.
pub fn build_fallback_config(
    last_good: &ConfigGraph,
    current: &ConfigGraph,
    rejected: &[FlatEntityError],
) -> Result<ConfigGraph, FallbackError> {
    reconstruct(Some(last_good), current, rejected).map(|r| r.graph)
}

/// Excise every rejected entity's subgraph from `current` without recovery.
pub fn exclude_rejected_subgraphs(
    current: &ConfigGraph,
    rejected: &[FlatEntityError],
) -> Result<ConfigGraph, FallbackError> {
    reconstruct(None, current, rejected).map(|r| r.graph)
}

/// Rejected keys with duplicates collapsed, first occurrence order kept.
pub fn rejected_keys(rejected: &[FlatEntityError]) -> Vec<EntityKey> {
    let mut seen = BTreeSet::new();
    rejected
        .iter()
        .map(FlatEntityError::key)
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Excise, then recover when `last_good` is given.
pub fn reconstruct(
    last_good: Option<&ConfigGraph>,
    current: &ConfigGraph,
    rejected: &[FlatEntityError],
) -> Result<Reconstruction, FallbackError> {
    if rejected.is_empty() {
        return Err(FallbackError::EmptyRejectionList);
    }
    let keys = rejected_keys(rejected);

    let mut fallback = current.clone();
    let mut excised = Vec::new();
    for key in &keys {
        if !fallback.contains(key) {
            tracing::debug!(key = %key, "Rejected entity not present in current config");
            continue;
        }
        excised.extend(remove_subgraph(&mut fallback, key)?);
    }

    let mut recovered = Vec::new();
    if let Some(last_good) = last_good {
        for key in &keys {
            if !last_good.contains(key) {
                tracing::debug!(
                    key = %key,
                    "Rejected entity has no last known good version, removed without replacement"
                );
                continue;
            }
            recovered.extend(add_subgraph(last_good, &mut fallback, key)?);
        }
    }

    excised.sort();
    recovered.sort();

    tracing::info!(
        rejected = keys.len(),
        excised = excised.len(),
        recovered = recovered.len(),
        vertices = fallback.vertex_count(),
        "Fallback configuration built"
    );
    Ok(Reconstruction {
        graph: fallback,
        excised,
        recovered,
    })
}

/// Remove the weakly connected subgraph containing `key`. Edges go first,
/// then the vertex, for every member.
fn remove_subgraph(g: &mut ConfigGraph, key: &EntityKey) -> Result<Vec<EntityKey>, GraphError> {
    let members = weak_component_keys(g, key)?;
    for member in &members {
        for successor in g.successors(member)? {
            g.remove_edge(member, &successor)?;
        }
        for predecessor in g.predecessors(member)? {
            g.remove_edge(&predecessor, member)?;
        }
        g.remove_vertex(member)?;
        tracing::debug!(key = %member, rejected = %key, "Entity excised");
    }
    Ok(members)
}

/// Copy the weakly connected subgraph containing `key` from `src` into `dst`.
/// Returns the keys that were newly added.
fn add_subgraph(
    src: &ConfigGraph,
    dst: &mut ConfigGraph,
    key: &EntityKey,
) -> Result<Vec<EntityKey>, GraphError> {
    let members = weak_component_keys(src, key)?;

    let mut added = Vec::new();
    for member in &members {
        let mut entity = src
            .vertex(member)
            .cloned()
            .ok_or_else(|| GraphError::VertexNotFound {
                key: member.clone(),
                operation: "recover vertex",
            })?;
        entity.recovered = true;
        if dst.add_vertex(entity) {
            tracing::debug!(key = %member, rejected = %key, "Entity recovered");
            added.push(member.clone());
        }
    }

    for member in &members {
        for successor in src.successors(member)? {
            let kind = edge_kind(src, member, &successor)?;
            dst.add_edge(member, &successor, kind)?;
        }
    }

    // References from the retained configuration into the recovered subgraph.
    for predecessor in src.predecessors(key)? {
        if dst.contains(&predecessor) {
            let kind = edge_kind(src, &predecessor, key)?;
            dst.add_edge(&predecessor, key, kind)?;
        }
    }

    Ok(added)
}

fn edge_kind(
    g: &ConfigGraph,
    source: &EntityKey,
    target: &EntityKey,
) -> Result<EdgeKind, GraphError> {
    g.edge_kind(source, target)
        .ok_or_else(|| GraphError::VertexNotFound {
            key: target.clone(),
            operation: "recover edge",
        })
}
