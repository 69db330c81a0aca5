use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::{Map, Value, json};

use jobdash::dashboard::{PaginationController, aggregate, render_nodes};
use jobdash::models::{JobCollection, NodeCollection};

/// `count` jobs spread over 20 users, each running on 1-4 nodes.
fn jobs_payload(count: usize) -> Value {
    let mut jobs = Map::new();
    for i in 0..count {
        let snapshots: Map<String, Value> = (0..=i % 4)
            .map(|n| {
                (
                    format!("snap-{n}"),
                    json!({"slurmNodeName": format!("node-{n}"), "physicalNodeName": format!("host-{n}")}),
                )
            })
            .collect();
        jobs.insert(
            i.to_string(),
            json!({
                "spec": {"userName": format!("user-{}", i % 20)},
                "status": {
                    "slurmJobRunCurrentStatus": {"state": "RUNNING", "physicalNodeSnapshots": snapshots},
                    "slurmJobRunStatusHistory": [{"state": "PENDING"}, {"state": "RUNNING"}]
                }
            }),
        );
    }
    Value::Object(jobs)
}

fn nodes_payload(count: usize) -> Value {
    let nodes: Map<String, Value> = (0..count)
        .map(|i| {
            (
                format!("node-{i}"),
                json!({
                    "spec": {"slurmNodeSpec": {"goalState": if i % 10 == 0 { "down" } else { "up" }}},
                    "status": {"k8sNodeStatus": {"removed": false}, "slurmNodeStatus": {"removed": i % 7 == 0}}
                }),
            )
        })
        .collect();
    Value::Object(nodes)
}

fn benchmark_decode_jobs(c: &mut Criterion) {
    let payload = jobs_payload(5_000);
    c.bench_function("decode 5000 jobs", |b| {
        b.iter(|| JobCollection::from_value(black_box(&payload)).unwrap())
    });
}

fn benchmark_aggregate(c: &mut Criterion) {
    let jobs = JobCollection::from_value(&jobs_payload(5_000)).unwrap();
    c.bench_function("aggregate 5000 jobs", |b| b.iter(|| aggregate(black_box(&jobs))));
}

fn benchmark_load_and_render(c: &mut Criterion) {
    let jobs = JobCollection::from_value(&jobs_payload(5_000)).unwrap();
    c.bench_function("load and render first page", |b| {
        b.iter(|| {
            let mut controller = PaginationController::new();
            controller.load(black_box(jobs.clone()));
            controller.render()
        })
    });

    let mut controller = PaginationController::new();
    controller.load(jobs);
    c.bench_function("render second page", |b| b.iter(|| controller.render_page(black_box(2))));
}

fn benchmark_render_nodes(c: &mut Criterion) {
    let nodes = NodeCollection::from_value(&nodes_payload(1_000)).unwrap();
    c.bench_function("render 1000 nodes", |b| b.iter(|| render_nodes(black_box(&nodes))));
}

criterion_group!(
    benches,
    benchmark_decode_jobs,
    benchmark_aggregate,
    benchmark_load_and_render,
    benchmark_render_nodes
);
criterion_main!(benches);
