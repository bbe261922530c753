//! Cycle detection and long-run aggregation benchmarks.

use criterion::{criterion_group, criterion_main, Criterion};
use mp_analysis::validation::Graph;
use mp_analysis::{CollectionBundle, LongCollectionBundle, ResponseStatus};
use serde_json::json;

/// A chain of `n` nodes with a back edge every `stride` nodes.
fn chain_with_back_edges(n: u32, stride: u32) -> Graph<u32> {
    let mut graph = Graph::new();
    for i in 0..n {
        graph.add_edge(i, i + 1);
        if i % stride == stride - 1 {
            graph.add_edge(i, i + 1 - stride);
        }
    }
    graph
}

/// `objects` objects, each parent of the next, with `cycle` appended to names.
fn payload(objects: usize, cycle: usize) -> String {
    let key = |i: usize| {
        json!({"name": format!("object {i} {}", cycle % 3), "adapterKind": "Bench", "objectKind": "Node", "identifiers": []})
    };
    let result: Vec<_> = (0..objects)
        .map(|i| {
            json!({
                "key": key(i),
                "metrics": [{"key": "cpu", "numberValue": i}],
                "properties": [{"key": "state", "stringValue": format!("{}", cycle % 2)}],
                "events": []
            })
        })
        .collect();
    let relationships: Vec<_> = (1..objects)
        .map(|i| json!({"parent": key(i - 1), "children": [key(i)]}))
        .collect();
    json!({"result": result, "relationships": relationships}).to_string()
}

fn cycle_detection_benchmark(c: &mut Criterion) {
    let small = chain_with_back_edges(1_000, 10);
    let large = chain_with_back_edges(50_000, 100);

    c.bench_function("cycles_1k_nodes", |b| b.iter(|| small.cycles()));
    c.bench_function("cycles_50k_nodes", |b| b.iter(|| large.cycles()));
}

fn long_run_benchmark(c: &mut Criterion) {
    let bodies: Vec<String> = (0..24).map(|cycle| payload(500, cycle)).collect();

    c.bench_function("long_run_24_cycles_500_objects", |b| {
        b.iter(|| {
            let mut run = LongCollectionBundle::new(300.0, 7200.0);
            for (i, body) in bodies.iter().enumerate() {
                run.add(CollectionBundle::new(i + 1, ResponseStatus::ok(), body.clone(), 1.0));
            }
            run.validate()
        })
    });
}

criterion_group!(benches, cycle_detection_benchmark, long_run_benchmark);
criterion_main!(benches);
