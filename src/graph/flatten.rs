//! Graph → flat declarative document.
//!
//! Nesting is not re-created. Each containment edge is re-expressed as a
//! reference field on the child (route.service, plugin.route, target.upstream,
//! sni.certificate), leaving re-nesting to the transport if its target format
//! needs it. Recovered entities are tagged with [`RECOVERED_TAG`].

use crate::declarative::schema::{Content, Reference};
use crate::graph::config_graph::{ConfigGraph, EdgeKind};
use crate::graph::entity::{Entity, EntityPayload, EntityType, RECOVERED_TAG};
use crate::graph::error::GraphError;

/// Flatten `g` into a declarative document. Vertices are emitted in key order.
pub fn to_flat_document(g: &ConfigGraph) -> Result<Content, GraphError> {
    let mut content = Content {
        format_version: Some("3.0".to_string()),
        ..Default::default()
    };

    for entity in g.vertices() {
        let key = entity.key();
        let found = entity.payload.entity_type();
        if found != entity.entity_type {
            return Err(GraphError::PayloadMismatch {
                key,
                expected: entity.entity_type,
                found,
            });
        }

        let mut payload = entity.payload.clone();
        for parent in g.predecessors(&key)? {
            if g.edge_kind(&parent, &key) == Some(EdgeKind::Contains) {
                if let Some(parent) = g.vertex(&parent) {
                    link_parent(&mut payload, parent);
                }
            }
        }
        if entity.recovered {
            let tags = payload.tags_mut();
            if !tags.iter().any(|tag| tag == RECOVERED_TAG) {
                tags.push(RECOVERED_TAG.to_string());
            }
        }

        match payload {
            EntityPayload::Service(service) => content.services.push(service),
            EntityPayload::Route(route) => content.routes.push(route),
            EntityPayload::Plugin(plugin) => content.plugins.push(plugin),
            EntityPayload::Upstream(upstream) => content.upstreams.push(upstream),
            EntityPayload::Target(target) => content.targets.push(target),
            EntityPayload::Certificate(certificate) => content.certificates.push(certificate),
            EntityPayload::CaCertificate(ca) => content.ca_certificates.push(ca),
            EntityPayload::Sni(sni) => content.snis.push(sni),
            EntityPayload::Consumer(consumer) => content.consumers.push(consumer),
        }
    }

    tracing::debug!(
        services = content.services.len(),
        routes = content.routes.len(),
        plugins = content.plugins.len(),
        "Graph flattened"
    );
    Ok(content)
}

/// Point a child payload at its containing parent.
fn link_parent(child: &mut EntityPayload, parent: &Entity) {
    let reference = Some(Reference::name(parent.name.as_str()));
    match (child, parent.entity_type) {
        (EntityPayload::Route(route), EntityType::Service) => route.service = reference,
        (EntityPayload::Plugin(plugin), EntityType::Service) => plugin.service = reference,
        (EntityPayload::Plugin(plugin), EntityType::Route) => plugin.route = reference,
        (EntityPayload::Plugin(plugin), EntityType::Consumer) => plugin.consumer = reference,
        (EntityPayload::Target(target), EntityType::Upstream) => target.upstream = reference,
        (EntityPayload::Sni(sni), EntityType::Certificate) => sni.certificate = reference,
        (child, parent_type) => {
            tracing::warn!(
                child = %child.entity_type(),
                parent = %parent_type,
                "No reference field for containment edge"
            );
        }
    }
}
