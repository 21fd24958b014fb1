//! Weakly connected component analysis.
//!
//! # Responsibilities
//! - Undirected depth-first traversal over a directed graph
//! - Partition a graph into independent component graphs
//!
//! # Design Decisions
//! - Edge direction is ignored for reachability: ownership edges point from
//!   parent to child while reference edges point from the referencing entity,
//!   so directed reachability would miss dependents
//! - Vertices are visited in key order, making the output deterministic

use std::collections::BTreeSet;

use crate::graph::config_graph::ConfigGraph;
use crate::graph::entity::EntityKey;
use crate::graph::error::GraphError;

/// Every key connected to `start` ignoring edge direction, in DFS discovery
/// order (`start` first).
pub fn weak_component_keys(
    g: &ConfigGraph,
    start: &EntityKey,
) -> Result<Vec<EntityKey>, GraphError> {
    if !g.contains(start) {
        return Err(GraphError::VertexNotFound {
            key: start.clone(),
            operation: "component traversal",
        });
    }

    let mut visited = BTreeSet::new();
    let mut order = Vec::new();
    let mut stack = vec![start.clone()];

    while let Some(key) = stack.pop() {
        if !visited.insert(key.clone()) {
            continue;
        }
        // Reverse so the smallest neighbour is explored first.
        for neighbour in g.neighbors(&key)?.into_iter().rev() {
            if !visited.contains(&neighbour) {
                stack.push(neighbour);
            }
        }
        order.push(key);
    }

    Ok(order)
}

/// Split `g` into its weakly connected components, each an independent graph
/// holding the induced subgraph. Ordered by each component's smallest key.
pub fn connected_components(g: &ConfigGraph) -> Result<Vec<ConfigGraph>, GraphError> {
    let mut visited: BTreeSet<EntityKey> = BTreeSet::new();
    let mut components = Vec::new();

    for key in g.keys() {
        if visited.contains(key) {
            continue;
        }
        let members = weak_component_keys(g, key)?;
        let component = g.induced_subgraph(&members)?;
        visited.extend(members);
        components.push(component);
    }

    tracing::debug!(
        vertices = g.vertex_count(),
        components = components.len(),
        "Connected components computed"
    );
    Ok(components)
}

/// The component holding `key`, if any.
pub fn component_containing<'a>(
    components: &'a [ConfigGraph],
    key: &EntityKey,
) -> Option<&'a ConfigGraph> {
    components.iter().find(|component| component.contains(key))
}
