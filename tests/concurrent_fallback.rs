//! Independent fallback generations running concurrently.

mod common;

use std::sync::Arc;

use common::{graph, key, CURRENT, LAST_GOOD};
use gateway_fallback::fallback::{build_fallback_config, FlatEntityError};
use gateway_fallback::graph::{connected_components, ConfigGraph};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_generations_on_shared_inputs() {
    let last_good = Arc::new(graph(LAST_GOOD));
    let current = Arc::new(graph(CURRENT));

    let mut handles = Vec::new();
    for i in 0..16 {
        let last_good = Arc::clone(&last_good);
        let current = Arc::clone(&current);
        handles.push(tokio::task::spawn_blocking(move || {
            let rejected = if i % 2 == 0 {
                FlatEntityError::new("route", "r1")
            } else {
                FlatEntityError::new("route", "r2")
            };
            build_fallback_config(&last_good, &current, &[rejected])
        }));
    }

    for handle in handles {
        let fallback = handle.await.unwrap().unwrap();
        assert_eq!(fallback.vertex_count(), current.vertex_count());
    }

    // Shared inputs are never mutated.
    assert_eq!(*current, graph(CURRENT));
    assert_eq!(*last_good, graph(LAST_GOOD));
}

#[tokio::test]
async fn components_of_disjoint_graphs_in_parallel() {
    let graphs: Vec<ConfigGraph> = vec![graph(LAST_GOOD), graph(CURRENT)];

    let tasks: Vec<_> = graphs
        .into_iter()
        .map(|g| tokio::spawn(async move { connected_components(&g).unwrap() }))
        .collect();

    for task in tasks {
        let components = task.await.unwrap();
        assert_eq!(components.len(), 2);
        assert!(components[0].contains(&key("plugin", "p1")));
        assert!(components[1].contains(&key("route", "r2")));
    }
}
