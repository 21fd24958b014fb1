//! Keyed directed acyclic graph of configuration entities.
//!
//! Vertices are addressed by [`EntityKey`]; the petgraph node indices never
//! leave this module. A `StableDiGraph` keeps indices valid across removals,
//! which the fallback reconstruction relies on while excising subgraphs.

use std::collections::BTreeMap;
use std::fmt;

use petgraph::algo::has_path_connecting;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;

use crate::graph::entity::{Entity, EntityKey};
use crate::graph::error::GraphError;

/// Relationship encoded by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Structural nesting, parent → child.
    Contains,
    /// A reference field on the source names the target.
    References,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Contains => f.write_str("contains"),
            EdgeKind::References => f.write_str("references"),
        }
    }
}

/// An edge expressed in keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub source: EntityKey,
    pub target: EntityKey,
    pub kind: EdgeKind,
}

/// Directed acyclic dependency graph of entities.
#[derive(Debug, Clone, Default)]
pub struct ConfigGraph {
    graph: StableDiGraph<Entity, EdgeKind>,
    index: BTreeMap<EntityKey, NodeIndex>,
}

impl ConfigGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn vertex(&self, key: &EntityKey) -> Option<&Entity> {
        self.index.get(key).map(|&ix| &self.graph[ix])
    }

    /// Vertex keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &EntityKey> {
        self.index.keys()
    }

    /// Vertices in key order.
    pub fn vertices(&self) -> impl Iterator<Item = &Entity> {
        self.index.values().map(move |&ix| &self.graph[ix])
    }

    /// Add a vertex. Returns `false` and keeps the existing entity when the
    /// key is already present.
    pub fn add_vertex(&mut self, entity: Entity) -> bool {
        let key = entity.key();
        if self.index.contains_key(&key) {
            return false;
        }
        let ix = self.graph.add_node(entity);
        self.index.insert(key, ix);
        true
    }

    /// Add an edge. Returns `false` when the edge already exists.
    ///
    /// Fails without modifying the graph if either endpoint is missing or the
    /// edge would close a cycle.
    pub fn add_edge(
        &mut self,
        source: &EntityKey,
        target: &EntityKey,
        kind: EdgeKind,
    ) -> Result<bool, GraphError> {
        let from = self.node(source, "add edge")?;
        let to = self.node(target, "add edge")?;

        if self.graph.find_edge(from, to).is_some() {
            return Ok(false);
        }
        if has_path_connecting(&self.graph, to, from, None) {
            return Err(GraphError::CycleDetected {
                from: source.clone(),
                to: target.clone(),
            });
        }

        self.graph.add_edge(from, to, kind);
        Ok(true)
    }

    pub fn has_edge(&self, source: &EntityKey, target: &EntityKey) -> bool {
        self.edge_kind(source, target).is_some()
    }

    pub fn edge_kind(&self, source: &EntityKey, target: &EntityKey) -> Option<EdgeKind> {
        let from = *self.index.get(source)?;
        let to = *self.index.get(target)?;
        self.graph.find_edge(from, to).map(|e| self.graph[e])
    }

    /// Remove an edge. Returns `false` when there was no such edge.
    pub fn remove_edge(
        &mut self,
        source: &EntityKey,
        target: &EntityKey,
    ) -> Result<bool, GraphError> {
        let from = self.node(source, "remove edge")?;
        let to = self.node(target, "remove edge")?;
        Ok(match self.graph.find_edge(from, to) {
            Some(edge) => self.graph.remove_edge(edge).is_some(),
            None => false,
        })
    }

    /// Remove a vertex after dropping every incident edge in both directions.
    pub fn remove_vertex(&mut self, key: &EntityKey) -> Result<Entity, GraphError> {
        let ix = self.node(key, "remove vertex")?;

        let incident: Vec<_> = self
            .graph
            .edges_directed(ix, Direction::Outgoing)
            .chain(self.graph.edges_directed(ix, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        for edge in incident {
            self.graph.remove_edge(edge);
        }

        let entity = self
            .graph
            .remove_node(ix)
            .ok_or_else(|| GraphError::VertexNotFound {
                key: key.clone(),
                operation: "remove vertex",
            })?;
        self.index.remove(key);
        Ok(entity)
    }

    /// Keys with an edge from `key`, sorted.
    pub fn successors(&self, key: &EntityKey) -> Result<Vec<EntityKey>, GraphError> {
        self.neighbors_directed(key, Direction::Outgoing, "successors")
    }

    /// Keys with an edge into `key`, sorted.
    pub fn predecessors(&self, key: &EntityKey) -> Result<Vec<EntityKey>, GraphError> {
        self.neighbors_directed(key, Direction::Incoming, "predecessors")
    }

    /// Successors and predecessors merged, sorted and deduplicated.
    pub fn neighbors(&self, key: &EntityKey) -> Result<Vec<EntityKey>, GraphError> {
        let ix = self.node(key, "neighbors")?;
        let mut keys: Vec<EntityKey> = self
            .graph
            .neighbors_undirected(ix)
            .map(|n| self.graph[n].key())
            .collect();
        keys.sort();
        keys.dedup();
        Ok(keys)
    }

    /// All edges, sorted.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .graph
            .edge_references()
            .map(|e| Edge {
                source: self.graph[e.source()].key(),
                target: self.graph[e.target()].key(),
                kind: *e.weight(),
            })
            .collect();
        edges.sort();
        edges
    }

    /// Independent copy restricted to `keys`, with every edge between them.
    pub fn induced_subgraph<'a, I>(&self, keys: I) -> Result<ConfigGraph, GraphError>
    where
        I: IntoIterator<Item = &'a EntityKey>,
    {
        let mut subgraph = ConfigGraph::new();
        for key in keys {
            let ix = self.node(key, "induced subgraph")?;
            subgraph.add_vertex(self.graph[ix].clone());
        }
        for edge in self.edges() {
            if subgraph.contains(&edge.source) && subgraph.contains(&edge.target) {
                subgraph.add_edge(&edge.source, &edge.target, edge.kind)?;
            }
        }
        Ok(subgraph)
    }

    pub(crate) fn inner(&self) -> &StableDiGraph<Entity, EdgeKind> {
        &self.graph
    }

    fn node(&self, key: &EntityKey, operation: &'static str) -> Result<NodeIndex, GraphError> {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| GraphError::VertexNotFound {
                key: key.clone(),
                operation,
            })
    }

    fn neighbors_directed(
        &self,
        key: &EntityKey,
        direction: Direction,
        operation: &'static str,
    ) -> Result<Vec<EntityKey>, GraphError> {
        let ix = self.node(key, operation)?;
        let mut keys: Vec<EntityKey> = self
            .graph
            .neighbors_directed(ix, direction)
            .map(|n| self.graph[n].key())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

impl PartialEq for ConfigGraph {
    fn eq(&self, other: &Self) -> bool {
        self.vertices().eq(other.vertices()) && self.edges() == other.edges()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarative::schema::{Route, Service};

    fn service(name: &str) -> Entity {
        Entity::from_service(&Service {
            name: Some(name.into()),
            ..Default::default()
        })
        .unwrap()
    }

    fn route(name: &str) -> Entity {
        Entity::from_route(&Route {
            name: Some(name.into()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut g = ConfigGraph::new();
        assert!(g.add_vertex(service("s1")));
        assert!(!g.add_vertex(service("s1")));
        g.add_vertex(route("r1"));

        let s1 = EntityKey::from_parts("service", "s1");
        let r1 = EntityKey::from_parts("route", "r1");
        assert!(g.add_edge(&s1, &r1, EdgeKind::Contains).unwrap());
        assert!(!g.add_edge(&s1, &r1, EdgeKind::Contains).unwrap());

        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_kind(&s1, &r1), Some(EdgeKind::Contains));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut g = ConfigGraph::new();
        g.add_vertex(service("s1"));
        g.add_vertex(route("r1"));
        let s1 = EntityKey::from_parts("service", "s1");
        let r1 = EntityKey::from_parts("route", "r1");

        g.add_edge(&s1, &r1, EdgeKind::Contains).unwrap();
        let err = g.add_edge(&r1, &s1, EdgeKind::References).unwrap_err();
        assert_eq!(
            err,
            GraphError::CycleDetected {
                from: r1.clone(),
                to: s1.clone()
            }
        );
        assert_eq!(g.edge_count(), 1);

        assert!(matches!(
            g.add_edge(&s1, &s1, EdgeKind::References),
            Err(GraphError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_missing_endpoint() {
        let mut g = ConfigGraph::new();
        g.add_vertex(service("s1"));
        let s1 = EntityKey::from_parts("service", "s1");
        let ghost = EntityKey::from_parts("route", "ghost");

        assert_eq!(
            g.add_edge(&s1, &ghost, EdgeKind::Contains),
            Err(GraphError::VertexNotFound {
                key: ghost.clone(),
                operation: "add edge"
            })
        );
        assert!(g.remove_vertex(&ghost).is_err());
    }

    #[test]
    fn test_remove_vertex_drops_incident_edges() {
        let mut g = ConfigGraph::new();
        g.add_vertex(service("s1"));
        g.add_vertex(route("r1"));
        g.add_vertex(route("r2"));
        let s1 = EntityKey::from_parts("service", "s1");
        let r1 = EntityKey::from_parts("route", "r1");
        let r2 = EntityKey::from_parts("route", "r2");
        g.add_edge(&s1, &r1, EdgeKind::Contains).unwrap();
        g.add_edge(&r2, &s1, EdgeKind::References).unwrap();

        let removed = g.remove_vertex(&s1).unwrap();
        assert_eq!(removed.name, "s1");
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.keys().cloned().collect::<Vec<_>>(), vec![r1.clone(), r2.clone()]);
        assert!(g.neighbors(&r1).unwrap().is_empty());
    }

    #[test]
    fn test_neighbors_merge_directions() {
        let mut g = ConfigGraph::new();
        g.add_vertex(service("s1"));
        g.add_vertex(route("r1"));
        g.add_vertex(route("r2"));
        let s1 = EntityKey::from_parts("service", "s1");
        let r1 = EntityKey::from_parts("route", "r1");
        let r2 = EntityKey::from_parts("route", "r2");
        g.add_edge(&s1, &r1, EdgeKind::Contains).unwrap();
        g.add_edge(&r2, &s1, EdgeKind::References).unwrap();

        assert_eq!(g.successors(&s1).unwrap(), vec![r1.clone()]);
        assert_eq!(g.predecessors(&s1).unwrap(), vec![r2.clone()]);
        assert_eq!(g.neighbors(&s1).unwrap(), vec![r1, r2]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut g = ConfigGraph::new();
        g.add_vertex(service("s1"));
        let s1 = EntityKey::from_parts("service", "s1");

        let mut copy = g.clone();
        copy.remove_vertex(&s1).unwrap();
        assert!(g.contains(&s1));
        assert!(!copy.contains(&s1));
        assert_ne!(g, copy);
    }
}
