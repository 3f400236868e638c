//! Benchmarks for the feasibility battery and the system performance
//! evaluator, the hot path shared by every search algorithm.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use edgeplan::model::System;
use edgeplan::placement::{check_feasibility, Assignment, Candidate, Placement};
use edgeplan::perf::evaluator;

/// A chain of components, each placeable on a shared edge node, a shared
/// VM or a per-chain FaaS function.
fn chain_system(components: usize) -> System {
    let mut comps = serde_json::Map::new();
    let mut compat = serde_json::Map::new();
    let mut perf = serde_json::Map::new();
    let mut dag = serde_json::Map::new();
    for i in 1..=components {
        let name = format!("c{i}");
        comps.insert(
            name.clone(),
            json!({"s1": {"base": {"early_exit_probability": 0.0, "data_size": [0.5]}}}),
        );
        compat.insert(
            name.clone(),
            json!({"base": [
                {"resource": "E1", "memory": 128.0},
                {"resource": "VM1", "memory": 128.0},
                {"resource": "F1", "memory": 128.0}
            ]}),
        );
        perf.insert(
            name.clone(),
            json!({"base": {
                "E1": {"model": "QTedge", "demand": 0.004},
                "VM1": {"model": "QTcloud", "demand": 0.002},
                "F1": {"model": "FAAS", "demandWarm": 0.01, "demandCold": 0.1}
            }}),
        );
        let next: Vec<String> = if i < components {
            vec![format!("c{}", i + 1)]
        } else {
            Vec::new()
        };
        dag.insert(name, json!({"next": next, "transition_probability": [1.0]}));
    }
    let doc = json!({
        "EdgeResources": {
            "computationallayer1": {"E1": {"number": 4, "cost": 0.05, "memory": 8192.0}}
        },
        "CloudResources": {
            "computationallayer2": {"VM1": {"number": 8, "cost": 0.3, "memory": 16384.0}}
        },
        "FaaSResources": {
            "computationallayer3": {"F1": {"cost": 0.5, "memory": 2048.0,
                "idle_time_before_kill": 600.0, "transition_cost": 0.1}}
        },
        "Components": comps,
        "CompatibilityMatrix": compat,
        "Performance": perf,
        "NetworkTechnology": {
            "ND1": {"computationalLayers": ["computationallayer1", "computationallayer2",
                                            "computationallayer3"],
                    "AccessDelay": 0.002, "Bandwidth": 500.0}
        },
        "LocalConstraints": {},
        "GlobalConstraints": {},
        "DirectedAcyclicGraph": dag,
        "Lambda": 10.0,
        "Time": 1.0
    });
    System::from_json(&doc).unwrap()
}

fn spread_placement(sys: &System) -> Placement {
    let mut y = Placement::empty(sys);
    for i in 0..sys.n_components() {
        // alternate between the edge node and the VM, cloud-monotone order
        let resource = if i < sys.n_components() / 2 { 0 } else { 1 };
        y.set(i, 0, Some(Assignment { resource, count: 2 }));
    }
    y
}

fn benchmark_feasibility(c: &mut Criterion) {
    let mut group = c.benchmark_group("feasibility");
    for size in [5usize, 15, 30] {
        let sys = chain_system(size);
        let y = spread_placement(&sys);
        group.bench_function(format!("battery_{size}_components"), |b| {
            b.iter(|| check_feasibility(black_box(&sys), black_box(&y)));
        });
    }
    group.finish();
}

fn benchmark_performance_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("performance");
    let sys = chain_system(15);
    let y = spread_placement(&sys);
    group.bench_function("compute_performance_15", |b| {
        b.iter(|| evaluator::compute_performance(black_box(&sys), black_box(&y)));
    });
    group.bench_function("candidate_evaluate_15", |b| {
        b.iter(|| Candidate::evaluate(black_box(&sys), black_box(y.clone())));
    });
    group.finish();
}

criterion_group!(benches, benchmark_feasibility, benchmark_performance_evaluation);
criterion_main!(benches);
