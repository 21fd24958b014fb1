//! Graph construction from a flat declarative document.
//!
//! # Responsibilities
//! - Turn every nested or top-level entity into exactly one vertex
//! - Containment edges parent → child (service → route, route → plugin, ...)
//! - Reference edges in the direction of the reference (plugin → service, ...)
//! - Reject cycles and unresolvable references as build errors
//!
//! # Design Decisions
//! - Two passes: vertices first, edges second, so references resolve no matter
//!   where in the document the referenced entity is declared
//! - Identical re-declarations and duplicate edges are deduplicated; a key
//!   declared twice with different attributes is an error, except for
//!   anonymous plugins, where the first declaration wins
//! - Targets are keyed `upstream/address`, so upstreams sharing a backend
//!   keep separate targets
//! - References resolve by name first, then by declared `id`

use std::collections::HashMap;

use crate::declarative::schema::{
    Certificate, Consumer, Content, Plugin, Reference, Route, Service, Sni, Target, Upstream,
};
use crate::graph::config_graph::{ConfigGraph, EdgeKind};
use crate::graph::entity::{Entity, EntityKey, EntityType};
use crate::graph::error::GraphError;

/// Build the dependency graph of `content`.
pub fn build_config_graph(content: &Content) -> Result<ConfigGraph, GraphError> {
    let mut builder = GraphBuilder::default();
    builder.collect(content)?;
    let graph = builder.connect()?;

    tracing::debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Configuration graph built"
    );
    Ok(graph)
}

/// Edge endpoint awaiting resolution.
#[derive(Debug)]
enum EdgeTarget {
    Key(EntityKey),
    Ref(EntityType, Reference),
}

#[derive(Debug)]
struct PendingEdge {
    source: EntityKey,
    target: EdgeTarget,
    kind: EdgeKind,
}

#[derive(Debug, Default)]
struct GraphBuilder {
    graph: ConfigGraph,
    /// Declared ids → vertex key, per entity type.
    ids: HashMap<(EntityType, String), EntityKey>,
    pending: Vec<PendingEdge>,
}

impl GraphBuilder {
    fn collect(&mut self, content: &Content) -> Result<(), GraphError> {
        for ca_certificate in &content.ca_certificates {
            self.vertex(
                Entity::from_ca_certificate(ca_certificate)?,
                ca_certificate.id.as_deref(),
            )?;
        }
        for certificate in &content.certificates {
            self.certificate(certificate)?;
        }
        for sni in &content.snis {
            self.sni(sni)?;
        }
        for service in &content.services {
            self.service(service)?;
        }
        for route in &content.routes {
            self.route(route)?;
        }
        for upstream in &content.upstreams {
            self.upstream(upstream)?;
        }
        for target in &content.targets {
            self.target(target, None)?;
        }
        for consumer in &content.consumers {
            self.consumer(consumer)?;
        }
        for plugin in &content.plugins {
            self.plugin(plugin)?;
        }
        Ok(())
    }

    fn connect(mut self) -> Result<ConfigGraph, GraphError> {
        let pending = std::mem::take(&mut self.pending);
        for edge in pending {
            let target = match edge.target {
                EdgeTarget::Key(key) => key,
                EdgeTarget::Ref(entity_type, reference) => self.resolve(entity_type, &reference)?,
            };
            if !self.graph.add_edge(&edge.source, &target, edge.kind)? {
                tracing::trace!(source = %edge.source, target = %target, "Edge already present");
            }
        }
        Ok(self.graph)
    }

    fn vertex(&mut self, entity: Entity, id: Option<&str>) -> Result<EntityKey, GraphError> {
        let key = entity.key();
        let entity_type = entity.entity_type;
        let identical = self
            .graph
            .vertex(&key)
            .map(|existing| existing.payload == entity.payload);
        match identical {
            Some(true) => tracing::trace!(key = %key, "Vertex already present, deduplicated"),
            Some(false) if entity.is_anonymous_plugin() => {
                tracing::warn!(key = %key, "Anonymous plugins of the same type collide, keeping the first");
            }
            Some(false) => return Err(GraphError::ConflictingDuplicate { key }),
            None => {
                self.graph.add_vertex(entity);
            }
        }
        if let Some(id) = id {
            self.ids
                .entry((entity_type, id.to_string()))
                .or_insert_with(|| key.clone());
        }
        Ok(key)
    }

    fn contains(&mut self, parent: &EntityKey, child: EntityKey) {
        self.pending.push(PendingEdge {
            source: parent.clone(),
            target: EdgeTarget::Key(child),
            kind: EdgeKind::Contains,
        });
    }

    fn reference(&mut self, source: &EntityKey, entity_type: EntityType, reference: &Reference) {
        self.pending.push(PendingEdge {
            source: source.clone(),
            target: EdgeTarget::Ref(entity_type, reference.clone()),
            kind: EdgeKind::References,
        });
    }

    fn resolve(&self, entity_type: EntityType, reference: &Reference) -> Result<EntityKey, GraphError> {
        let identifiers = reference.identifiers();
        for ident in &identifiers {
            let by_name = EntityKey::new(entity_type, ident);
            if self.graph.contains(&by_name) {
                return Ok(by_name);
            }
            if let Some(key) = self.ids.get(&(entity_type, ident.to_string())) {
                return Ok(key.clone());
            }
        }

        match identifiers.first() {
            Some(ident) => Err(GraphError::VertexNotFound {
                key: EntityKey::new(entity_type, ident),
                operation: "resolve reference",
            }),
            None => Err(GraphError::MissingField {
                entity_type,
                field: "id",
            }),
        }
    }

    fn service(&mut self, service: &Service) -> Result<EntityKey, GraphError> {
        let key = self.vertex(Entity::from_service(service)?, service.id.as_deref())?;
        for route in &service.routes {
            let child = self.route(route)?;
            self.contains(&key, child);
        }
        for plugin in &service.plugins {
            let child = self.plugin(plugin)?;
            self.contains(&key, child);
        }
        if let Some(certificate) = &service.client_certificate {
            self.reference(&key, EntityType::Certificate, certificate);
        }
        for ca_certificate in &service.ca_certificates {
            self.reference(&key, EntityType::CaCertificate, &Reference::name(ca_certificate.as_str()));
        }
        Ok(key)
    }

    fn route(&mut self, route: &Route) -> Result<EntityKey, GraphError> {
        let key = self.vertex(Entity::from_route(route)?, route.id.as_deref())?;
        for plugin in &route.plugins {
            let child = self.plugin(plugin)?;
            self.contains(&key, child);
        }
        if let Some(service) = &route.service {
            self.reference(&key, EntityType::Service, service);
        }
        Ok(key)
    }

    fn plugin(&mut self, plugin: &Plugin) -> Result<EntityKey, GraphError> {
        let key = self.vertex(Entity::from_plugin(plugin)?, plugin.id.as_deref())?;
        if let Some(service) = &plugin.service {
            self.reference(&key, EntityType::Service, service);
        }
        if let Some(route) = &plugin.route {
            self.reference(&key, EntityType::Route, route);
        }
        if let Some(consumer) = &plugin.consumer {
            self.reference(&key, EntityType::Consumer, consumer);
        }
        Ok(key)
    }

    fn upstream(&mut self, upstream: &Upstream) -> Result<EntityKey, GraphError> {
        let key = self.vertex(Entity::from_upstream(upstream)?, upstream.id.as_deref())?;
        for target in &upstream.targets {
            let child = self.target(target, upstream.name.as_deref())?;
            self.contains(&key, child);
        }
        Ok(key)
    }

    fn target(&mut self, target: &Target, upstream: Option<&str>) -> Result<EntityKey, GraphError> {
        let key = self.vertex(Entity::from_target(target, upstream)?, target.id.as_deref())?;
        if let Some(upstream) = &target.upstream {
            self.reference(&key, EntityType::Upstream, upstream);
        }
        Ok(key)
    }

    fn certificate(&mut self, certificate: &Certificate) -> Result<EntityKey, GraphError> {
        let key = self.vertex(Entity::from_certificate(certificate)?, certificate.id.as_deref())?;
        for sni in &certificate.snis {
            let child = self.sni(sni)?;
            self.contains(&key, child);
        }
        Ok(key)
    }

    fn sni(&mut self, sni: &Sni) -> Result<EntityKey, GraphError> {
        let key = self.vertex(Entity::from_sni(sni)?, sni.id.as_deref())?;
        if let Some(certificate) = &sni.certificate {
            self.reference(&key, EntityType::Certificate, certificate);
        }
        Ok(key)
    }

    fn consumer(&mut self, consumer: &Consumer) -> Result<EntityKey, GraphError> {
        let key = self.vertex(Entity::from_consumer(consumer)?, consumer.id.as_deref())?;
        for plugin in &consumer.plugins {
            let child = self.plugin(plugin)?;
            self.contains(&key, child);
        }
        Ok(key)
    }
}
