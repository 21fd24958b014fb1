//! Entity model and identity.
//!
//! # Responsibilities
//! - Fixed enumeration of entity types
//! - Deterministic `type:name` keys
//! - Owned payloads with nested collections stripped
//!
//! # Design Decisions
//! - Keys depend on `(type, name)` only, never on payload contents
//! - Payloads are owned values; cloning an entity deep-copies its attributes
//! - Plugins without `instance_name` or `id` fall back to their type name, so
//!   two anonymous plugins of the same type collapse into one vertex

use std::fmt;
use std::str::FromStr;

use crate::declarative::schema::{
    CaCertificate, Certificate, Consumer, Plugin, Route, Service, Sni, Target, Upstream,
};
use crate::graph::error::GraphError;

/// Tag appended to entities restored from the last known good configuration.
pub const RECOVERED_TAG: &str = "recovered-from-last-valid-config";

/// Kind of configuration item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityType {
    Service,
    Route,
    Plugin,
    Upstream,
    Target,
    Certificate,
    CaCertificate,
    Sni,
    Consumer,
}

impl EntityType {
    /// Every supported entity type.
    pub const ALL: [EntityType; 9] = [
        EntityType::Service,
        EntityType::Route,
        EntityType::Plugin,
        EntityType::Upstream,
        EntityType::Target,
        EntityType::Certificate,
        EntityType::CaCertificate,
        EntityType::Sni,
        EntityType::Consumer,
    ];

    /// Canonical string form, as used in keys and rejection reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Service => "service",
            EntityType::Route => "route",
            EntityType::Plugin => "plugin",
            EntityType::Upstream => "upstream",
            EntityType::Target => "target",
            EntityType::Certificate => "certificate",
            EntityType::CaCertificate => "ca-certificate",
            EntityType::Sni => "sni",
            EntityType::Consumer => "consumer",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GraphError::UnknownEntityType(s.to_string()))
    }
}

/// Vertex key: `type:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(entity_type: EntityType, name: &str) -> Self {
        Self::from_parts(entity_type.as_str(), name)
    }

    /// Key from raw strings, e.g. a rejection report. Case sensitive.
    pub fn from_parts(entity_type: &str, name: &str) -> Self {
        EntityKey(format!("{}:{}", entity_type, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declarative attributes of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityPayload {
    Service(Service),
    Route(Route),
    Plugin(Plugin),
    Upstream(Upstream),
    Target(Target),
    Certificate(Certificate),
    CaCertificate(CaCertificate),
    Sni(Sni),
    Consumer(Consumer),
}

impl EntityPayload {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityPayload::Service(_) => EntityType::Service,
            EntityPayload::Route(_) => EntityType::Route,
            EntityPayload::Plugin(_) => EntityType::Plugin,
            EntityPayload::Upstream(_) => EntityType::Upstream,
            EntityPayload::Target(_) => EntityType::Target,
            EntityPayload::Certificate(_) => EntityType::Certificate,
            EntityPayload::CaCertificate(_) => EntityType::CaCertificate,
            EntityPayload::Sni(_) => EntityType::Sni,
            EntityPayload::Consumer(_) => EntityType::Consumer,
        }
    }

    /// Mutable access to the entity's tag list.
    pub fn tags_mut(&mut self) -> &mut Vec<String> {
        match self {
            EntityPayload::Service(e) => &mut e.tags,
            EntityPayload::Route(e) => &mut e.tags,
            EntityPayload::Plugin(e) => &mut e.tags,
            EntityPayload::Upstream(e) => &mut e.tags,
            EntityPayload::Target(e) => &mut e.tags,
            EntityPayload::Certificate(e) => &mut e.tags,
            EntityPayload::CaCertificate(e) => &mut e.tags,
            EntityPayload::Sni(e) => &mut e.tags,
            EntityPayload::Consumer(e) => &mut e.tags,
        }
    }
}

/// One configuration item held by a graph vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub entity_type: EntityType,
    /// Restored from the last known good configuration.
    pub recovered: bool,
    pub payload: EntityPayload,
}

impl Entity {
    pub fn new(name: impl Into<String>, payload: EntityPayload) -> Self {
        Self {
            name: name.into(),
            entity_type: payload.entity_type(),
            recovered: false,
            payload,
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::new(self.entity_type, &self.name)
    }

    pub fn from_service(service: &Service) -> Result<Self, GraphError> {
        let name = required(&service.name, EntityType::Service, "name")?;
        let mut payload = service.clone();
        payload.routes.clear();
        payload.plugins.clear();
        Ok(Self::new(name, EntityPayload::Service(payload)))
    }

    pub fn from_route(route: &Route) -> Result<Self, GraphError> {
        let name = required(&route.name, EntityType::Route, "name")?;
        let mut payload = route.clone();
        payload.plugins.clear();
        Ok(Self::new(name, EntityPayload::Route(payload)))
    }

    pub fn from_plugin(plugin: &Plugin) -> Result<Self, GraphError> {
        Ok(Self::new(plugin_name(plugin)?, EntityPayload::Plugin(plugin.clone())))
    }

    pub fn from_upstream(upstream: &Upstream) -> Result<Self, GraphError> {
        let name = required(&upstream.name, EntityType::Upstream, "name")?;
        let mut payload = upstream.clone();
        payload.targets.clear();
        Ok(Self::new(name, EntityPayload::Upstream(payload)))
    }

    /// Targets are named `upstream/address`. `upstream` is the containing
    /// upstream's name; a top-level target falls back to its own `upstream`
    /// reference. Without either, the bare address is used.
    pub fn from_target(target: &Target, upstream: Option<&str>) -> Result<Self, GraphError> {
        let address = required(&target.target, EntityType::Target, "target")?;
        let scope = upstream.or_else(|| {
            target
                .upstream
                .as_ref()
                .and_then(|reference| reference.identifiers().first().copied())
        });
        let name = match scope {
            Some(scope) => format!("{}/{}", scope, address),
            None => address,
        };
        Ok(Self::new(name, EntityPayload::Target(target.clone())))
    }

    /// A plugin with neither `instance_name` nor `id`, named after its type.
    pub fn is_anonymous_plugin(&self) -> bool {
        matches!(
            &self.payload,
            EntityPayload::Plugin(plugin) if plugin.instance_name.is_none() && plugin.id.is_none()
        )
    }

    pub fn from_certificate(certificate: &Certificate) -> Result<Self, GraphError> {
        let name = required(&certificate.id, EntityType::Certificate, "id")?;
        let mut payload = certificate.clone();
        payload.snis.clear();
        Ok(Self::new(name, EntityPayload::Certificate(payload)))
    }

    pub fn from_ca_certificate(ca_certificate: &CaCertificate) -> Result<Self, GraphError> {
        let name = required(&ca_certificate.id, EntityType::CaCertificate, "id")?;
        Ok(Self::new(name, EntityPayload::CaCertificate(ca_certificate.clone())))
    }

    pub fn from_sni(sni: &Sni) -> Result<Self, GraphError> {
        let name = required(&sni.name, EntityType::Sni, "name")?;
        Ok(Self::new(name, EntityPayload::Sni(sni.clone())))
    }

    pub fn from_consumer(consumer: &Consumer) -> Result<Self, GraphError> {
        let name = required(&consumer.username, EntityType::Consumer, "username")?;
        let mut payload = consumer.clone();
        payload.plugins.clear();
        Ok(Self::new(name, EntityPayload::Consumer(payload)))
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.name)
    }
}

/// Identity of a plugin: instance name, then id, then plugin type name.
pub fn plugin_name(plugin: &Plugin) -> Result<String, GraphError> {
    plugin
        .instance_name
        .as_ref()
        .or(plugin.id.as_ref())
        .or(plugin.name.as_ref())
        .cloned()
        .ok_or(GraphError::MissingField {
            entity_type: EntityType::Plugin,
            field: "name",
        })
}

fn required(
    field: &Option<String>,
    entity_type: EntityType,
    field_name: &'static str,
) -> Result<String, GraphError> {
    field.clone().ok_or(GraphError::MissingField {
        entity_type,
        field: field_name,
    })
}
