//! Declarative document schema definitions.
//!
//! This module defines the flat declarative configuration consumed and produced
//! by the gateway admin interface. All types derive Serde traits so the same
//! structures read JSON or YAML documents and write them back.
//!
//! Attributes the core does not need to reason about are kept verbatim in each
//! entity's `extra` map so a document survives a round trip unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unmodelled attributes, preserved as-is.
pub type Attributes = BTreeMap<String, Value>;

/// Root of a flat declarative document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Content {
    /// Declarative format version (e.g. "3.0").
    #[serde(rename = "_format_version", skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<Service>,

    /// Routes declared at the top level, referencing their service.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,

    /// Plugins declared at the top level, referencing service/route/consumer.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Plugin>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub upstreams: Vec<Upstream>,

    /// Targets declared at the top level, referencing their upstream.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<Target>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certificates: Vec<Certificate>,

    /// SNIs declared at the top level, referencing their certificate.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snis: Vec<Sni>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ca_certificates: Vec<CaCertificate>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumers: Vec<Consumer>,

    /// Document-level keys such as `_info`.
    #[serde(flatten)]
    pub extra: Attributes,
}

/// Foreign key to another entity.
///
/// Written either as a bare string or as an object carrying `id`, `name` or
/// `username`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Reference {
    Name(String),
    Object(ReferenceObject),
}

/// Object form of a [`Reference`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferenceObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Reference {
    /// Build a plain name reference.
    pub fn name(name: impl Into<String>) -> Self {
        Reference::Name(name.into())
    }

    /// Identifiers to try, in resolution order (names before ids).
    pub fn identifiers(&self) -> Vec<&str> {
        match self {
            Reference::Name(name) => vec![name.as_str()],
            Reference::Object(obj) => [&obj.name, &obj.username, &obj.id]
                .into_iter()
                .filter_map(|field| field.as_deref())
                .collect(),
        }
    }
}

/// Upstream API service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Unique service name (required for graph identity).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Routes nested under this service.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,

    /// Plugins nested under this service.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Plugin>,

    /// Client certificate presented to the upstream (mTLS).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<Reference>,

    /// Ids of CA certificates used to verify the upstream.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ca_certificates: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Attributes,
}

/// Request matching rule bound to a service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Route {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Owning service, for routes declared at the top level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Reference>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,

    /// Plugins nested under this route.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Plugin>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Attributes,
}

/// Plugin instance, scoped globally or to a service/route/consumer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Plugin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Plugin type name (e.g. "correlation-id").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Caller-assigned instance identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Attributes,
}

/// Virtual hostname backed by a set of targets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Upstream {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,

    /// Targets nested under this upstream.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<Target>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Attributes,
}

/// Backend address of an upstream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Target {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Address (e.g., "192.168.194.9:80").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Owning upstream, for targets declared at the top level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Attributes,
}

/// TLS certificate and key pair.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Certificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// SNIs nested under this certificate.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snis: Vec<Sni>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Attributes,
}

/// Server name bound to a certificate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Sni {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Owning certificate, for SNIs declared at the top level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<Reference>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Attributes,
}

/// Trusted CA certificate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CaCertificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Attributes,
}

/// API consumer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Consumer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,

    /// Plugins nested under this consumer.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Plugin>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Attributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_forms() {
        let plain: Reference = serde_json::from_str("\"svc\"").unwrap();
        assert_eq!(plain.identifiers(), vec!["svc"]);

        let object: Reference = serde_json::from_str(r#"{"id": "abc", "name": "svc"}"#).unwrap();
        assert_eq!(object.identifiers(), vec!["svc", "abc"]);
    }

    #[test]
    fn test_unknown_attributes_survive() {
        let yaml = r#"
_format_version: "3.0"
_info:
  select_tags:
  - managed
services:
- name: svc
  host: example.internal
  retries: 5
  routes:
  - name: r1
    strip_path: true
"#;
        let content: Content = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(content.format_version.as_deref(), Some("3.0"));
        assert!(content.extra.contains_key("_info"));

        let service = &content.services[0];
        assert_eq!(service.extra.get("retries"), Some(&Value::from(5)));
        assert_eq!(
            service.routes[0].extra.get("strip_path"),
            Some(&Value::Bool(true))
        );

        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["services"][0]["retries"], Value::from(5));
        assert_eq!(json["_info"]["select_tags"][0], "managed");
    }
}
