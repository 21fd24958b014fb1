//! Shared fixtures and helpers for integration tests.

#![allow(dead_code)]

use gateway_fallback::declarative::loader::{parse_document, DocumentFormat};
use gateway_fallback::declarative::Content;
use gateway_fallback::graph::{build_config_graph, ConfigGraph, EntityKey};

/// Last known good: s1 → r1 → p1 and s2 → r2.
pub const LAST_GOOD: &str = r#"
_format_version: "3.0"
services:
- name: s1
  host: s1.internal
  routes:
  - name: r1
    paths: ["/one"]
    plugins:
    - name: p1
      config:
        header_name: X-Request-Id
- name: s2
  host: s2.internal
  routes:
  - name: r2
    paths: ["/two"]
"#;

/// Same shape, r1 now carries a path the gateway rejects.
pub const CURRENT: &str = r#"
_format_version: "3.0"
services:
- name: s1
  host: s1.internal
  routes:
  - name: r1
    paths: ["~/(?<broken"]
    plugins:
    - name: p1
      config:
        header_name: X-Request-Id
- name: s2
  host: s2.internal
  routes:
  - name: r2
    paths: ["/two"]
"#;

pub fn document(yaml: &str) -> Content {
    parse_document(yaml, DocumentFormat::Yaml).expect("fixture parses")
}

pub fn graph(yaml: &str) -> ConfigGraph {
    build_config_graph(&document(yaml)).expect("fixture builds")
}

pub fn key(entity_type: &str, name: &str) -> EntityKey {
    EntityKey::from_parts(entity_type, name)
}

/// Sorted key strings of a graph.
pub fn key_strings(g: &ConfigGraph) -> Vec<String> {
    g.keys().map(|k| k.to_string()).collect()
}
