//! End-to-end fallback scenarios over real documents.

mod common;

use common::{document, graph, key, key_strings, CURRENT, LAST_GOOD};
use gateway_fallback::config::{DiagnosticsConfig, FallbackSettings};
use gateway_fallback::declarative::loader::{parse_document, render_document, DocumentFormat};
use gateway_fallback::declarative::Reference;
use gateway_fallback::fallback::{
    build_fallback_config, exclude_rejected_subgraphs, FallbackError, FallbackGenerator,
    FlatEntityError,
};
use gateway_fallback::graph::{build_config_graph, to_flat_document, RECOVERED_TAG};

fn tagged(tags: &[String]) -> bool {
    tags.iter().filter(|t| t.as_str() == RECOVERED_TAG).count() == 1
}

#[test]
fn rejected_route_is_recovered_with_its_component() {
    let last_good = graph(LAST_GOOD);
    let current = graph(CURRENT);

    let fallback =
        build_fallback_config(&last_good, &current, &[FlatEntityError::new("route", "r1")]).unwrap();
    assert_eq!(
        key_strings(&fallback),
        vec!["plugin:p1", "route:r1", "route:r2", "service:s1", "service:s2"]
    );

    let flat = to_flat_document(&fallback).unwrap();
    assert_eq!(flat.format_version.as_deref(), Some("3.0"));

    let r1 = flat.routes.iter().find(|r| r.name.as_deref() == Some("r1")).unwrap();
    assert_eq!(r1.paths, vec!["/one".to_string()]);
    assert_eq!(r1.service, Some(Reference::name("s1")));
    assert!(tagged(&r1.tags));

    let p1 = &flat.plugins[0];
    assert_eq!(p1.route, Some(Reference::name("r1")));
    assert!(tagged(&p1.tags));

    let s1 = flat.services.iter().find(|s| s.name.as_deref() == Some("s1")).unwrap();
    assert!(tagged(&s1.tags));

    let r2 = flat.routes.iter().find(|r| r.name.as_deref() == Some("r2")).unwrap();
    assert!(r2.tags.is_empty());
    let s2 = flat.services.iter().find(|s| s.name.as_deref() == Some("s2")).unwrap();
    assert!(s2.tags.is_empty());
}

#[test]
fn flattened_fallback_rebuilds_to_same_entities() {
    let fallback = build_fallback_config(
        &graph(LAST_GOOD),
        &graph(CURRENT),
        &[FlatEntityError::new("plugin", "p1")],
    )
    .unwrap();

    let json = render_document(&to_flat_document(&fallback).unwrap(), DocumentFormat::Json).unwrap();
    let rebuilt = build_config_graph(&parse_document(&json, DocumentFormat::Json).unwrap()).unwrap();
    assert_eq!(key_strings(&rebuilt), key_strings(&fallback));
    assert!(rebuilt.vertex(&key("route", "r1")).is_some());
}

#[test]
fn rejection_absent_from_both_configs_changes_nothing() {
    let current = graph(CURRENT);
    let fallback = build_fallback_config(
        &graph(LAST_GOOD),
        &current,
        &[FlatEntityError::new("consumer", "nobody")],
    )
    .unwrap();
    assert_eq!(fallback, current);
}

#[test]
fn empty_rejection_list_is_an_error() {
    let err = build_fallback_config(&graph(LAST_GOOD), &graph(CURRENT), &[]).unwrap_err();
    assert!(matches!(err, FallbackError::EmptyRejectionList));
}

#[test]
fn recovered_tag_is_not_duplicated() {
    // Last good already carries the tag from an earlier fallback.
    let last_good = graph(
        r#"
services:
- name: s1
  tags: ["recovered-from-last-valid-config"]
"#,
    );
    let current = graph("services:\n- name: s1\n  port: 0\n");
    let fallback =
        build_fallback_config(&last_good, &current, &[FlatEntityError::new("service", "s1")]).unwrap();
    let flat = to_flat_document(&fallback).unwrap();
    assert!(tagged(&flat.services[0].tags));
}

#[test]
fn generator_round_trip_with_rejection_strings() {
    let rejected: Vec<FlatEntityError> = ["route:r1", "plugin:p1"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    let outcome = FallbackGenerator::new(FallbackSettings::default(), DiagnosticsConfig::default())
        .generate(&document(LAST_GOOD), &document(CURRENT), &rejected)
        .unwrap();

    assert_eq!(
        outcome.summary.excised,
        vec![key("plugin", "p1"), key("route", "r1"), key("service", "s1")]
    );
    assert_eq!(outcome.summary.recovered, outcome.summary.excised);
    assert_eq!(outcome.document.routes.len(), 2);
}

#[test]
fn upstreams_sharing_a_backend_are_excised_independently() {
    let current = graph(
        r#"
upstreams:
- name: u1
  targets:
  - target: 10.0.0.1:80
    weight: 100
- name: u2
  targets:
  - target: 10.0.0.1:80
    weight: 5
"#,
    );
    assert_eq!(current.vertex_count(), 4);

    let fallback =
        exclude_rejected_subgraphs(&current, &[FlatEntityError::new("upstream", "u1")]).unwrap();
    assert_eq!(key_strings(&fallback), vec!["target:u2/10.0.0.1:80", "upstream:u2"]);

    let flat = to_flat_document(&fallback).unwrap();
    assert_eq!(flat.targets.len(), 1);
    assert_eq!(flat.targets[0].upstream, Some(Reference::name("u2")));
    assert_eq!(flat.targets[0].weight, Some(5));
}
