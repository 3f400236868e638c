//! Shared fixture systems for the integration suites.
#![allow(dead_code)]

use serde_json::{json, Value};

/// One component, one partition, two edge nodes. The cheaper node can
/// sustain `Lambda / demand` requests per second before saturating.
pub fn single_component_two_edges(lambda: f64) -> Value {
    json!({
        "EdgeResources": {
            "computationallayer1": {
                "EdgeCheap": {"number": 3, "cost": 0.1, "memory": 2048.0},
                "EdgeFast": {"number": 3, "cost": 0.5, "memory": 2048.0}
            }
        },
        "FaaSResources": {},
        "Components": {
            "c1": {"s1": {"base": {"early_exit_probability": 0.0, "data_size": [0.5]}}}
        },
        "CompatibilityMatrix": {
            "c1": {"base": [{"resource": "EdgeCheap", "memory": 512.0},
                            {"resource": "EdgeFast", "memory": 512.0}]}
        },
        "Performance": {
            "c1": {"base": {
                "EdgeCheap": {"model": "QTedge", "demand": 0.05},
                "EdgeFast": {"model": "QTedge", "demand": 0.05}
            }}
        },
        "NetworkTechnology": {
            "ND1": {"computationalLayers": ["computationallayer1"],
                    "AccessDelay": 0.005, "Bandwidth": 100.0}
        },
        "LocalConstraints": {},
        "GlobalConstraints": {},
        "DirectedAcyclicGraph": {"c1": {"next": []}},
        "Lambda": lambda,
        "Time": 1.0
    })
}

/// Two sequential components with local response-time bounds. Only the
/// expensive VM is fast enough for the first component, and the second
/// component is pinned to the cheap VM.
pub fn sequential_with_local_constraints() -> Value {
    json!({
        "EdgeResources": {},
        "CloudResources": {
            "computationallayer1": {
                "VMcheap": {"number": 1, "cost": 0.1, "memory": 4096.0},
                "VMfast": {"number": 1, "cost": 1.0, "memory": 4096.0}
            }
        },
        "FaaSResources": {},
        "Components": {
            "c1": {"s1": {"base": {"early_exit_probability": 0.0, "data_size": [1.0]}}},
            "c2": {"s1": {"base": {"early_exit_probability": 0.0, "data_size": [1.0]}}}
        },
        "CompatibilityMatrix": {
            "c1": {"base": [{"resource": "VMcheap", "memory": 512.0},
                            {"resource": "VMfast", "memory": 512.0}]},
            "c2": {"base": [{"resource": "VMcheap", "memory": 512.0}]}
        },
        "Performance": {
            "c1": {"base": {
                "VMcheap": {"model": "QTcloud", "demand": 0.06},
                "VMfast": {"model": "QTcloud", "demand": 0.02}
            }},
            "c2": {"base": {
                "VMcheap": {"model": "QTcloud", "demand": 0.03}
            }}
        },
        "NetworkTechnology": {
            "ND1": {"computationalLayers": ["computationallayer1"],
                    "AccessDelay": 0.005, "Bandwidth": 100.0}
        },
        "LocalConstraints": {
            "c1": {"local_res_time": 0.05},
            "c2": {"local_res_time": 0.1}
        },
        "GlobalConstraints": {},
        "DirectedAcyclicGraph": {"c1": {"next": ["c2"], "transition_probability": [1.0]}},
        "Lambda": 1.0,
        "Time": 1.0
    })
}

/// Three-component chain under a global path bound. A single small VM is
/// cheap but saturates at high rates; the serverless function never
/// saturates but bills per invocation.
pub fn chain_with_global_constraint(lambda: f64) -> Value {
    let mut performance = serde_json::Map::new();
    for c in ["c1", "c2", "c3"] {
        performance.insert(
            c.to_string(),
            json!({"base": {
                "VM1": {"model": "QTcloud", "demand": 0.02},
                "F1": {"model": "FAAS", "demandWarm": 0.05, "demandCold": 0.5}
            }}),
        );
    }
    json!({
        "EdgeResources": {},
        "CloudResources": {
            "computationallayer1": {
                "VM1": {"number": 1, "cost": 0.4, "memory": 8192.0}
            }
        },
        "FaaSResources": {
            "computationallayer2": {
                "F1": {"cost": 0.9, "memory": 1024.0,
                       "idle_time_before_kill": 600.0, "transition_cost": 0.2}
            }
        },
        "Components": {
            "c1": {"s1": {"base": {"early_exit_probability": 0.0, "data_size": [0.1]}}},
            "c2": {"s1": {"base": {"early_exit_probability": 0.0, "data_size": [0.1]}}},
            "c3": {"s1": {"base": {"early_exit_probability": 0.0, "data_size": [0.1]}}}
        },
        "CompatibilityMatrix": {
            "c1": {"base": [{"resource": "VM1", "memory": 256.0},
                            {"resource": "F1", "memory": 256.0}]},
            "c2": {"base": [{"resource": "VM1", "memory": 256.0},
                            {"resource": "F1", "memory": 256.0}]},
            "c3": {"base": [{"resource": "VM1", "memory": 256.0},
                            {"resource": "F1", "memory": 256.0}]}
        },
        "Performance": Value::Object(performance),
        "NetworkTechnology": {
            "ND1": {"computationalLayers": ["computationallayer1", "computationallayer2"],
                    "AccessDelay": 0.001, "Bandwidth": 1000.0}
        },
        "LocalConstraints": {},
        "GlobalConstraints": {
            "path1": {"components": ["c1", "c2", "c3"], "global_res_time": 0.2}
        },
        "DirectedAcyclicGraph": {
            "c1": {"next": ["c2"], "transition_probability": [1.0]},
            "c2": {"next": ["c3"], "transition_probability": [1.0]}
        },
        "Lambda": lambda,
        "Time": 1.0
    })
}

/// One component split into two pipelined partitions, placeable on two
/// edge nodes or a cloud VM. `h1` early-exits half of the requests.
pub fn two_stage_pipeline() -> Value {
    json!({
        "EdgeResources": {
            "computationallayer1": {
                "Edge1": {"number": 1, "cost": 0.1, "memory": 2048.0},
                "Edge2": {"number": 1, "cost": 0.1, "memory": 2048.0}
            }
        },
        "CloudResources": {
            "computationallayer2": {
                "VM1": {"number": 2, "cost": 0.4, "memory": 8192.0}
            }
        },
        "FaaSResources": {},
        "Components": {
            "c1": {"s1": {
                "h1": {"early_exit_probability": 0.5, "data_size": [1.0]},
                "h2": {"early_exit_probability": 0.0, "data_size": [0.5]}
            }}
        },
        "CompatibilityMatrix": {
            "c1": {
                "h1": [{"resource": "Edge1", "memory": 512.0},
                       {"resource": "VM1", "memory": 512.0}],
                "h2": [{"resource": "Edge1", "memory": 512.0},
                       {"resource": "Edge2", "memory": 512.0},
                       {"resource": "VM1", "memory": 512.0}]
            }
        },
        "Performance": {
            "c1": {
                "h1": {
                    "Edge1": {"model": "QTedge", "demand": 0.1},
                    "VM1": {"model": "QTcloud", "demand": 0.05}
                },
                "h2": {
                    "Edge1": {"model": "QTedge", "demand": 0.2},
                    "Edge2": {"model": "QTedge", "demand": 0.2},
                    "VM1": {"model": "QTcloud", "demand": 0.1}
                }
            }
        },
        "NetworkTechnology": {
            "ND1": {"computationalLayers": ["computationallayer1", "computationallayer2"],
                    "AccessDelay": 0.01, "Bandwidth": 80.0}
        },
        "LocalConstraints": {},
        "GlobalConstraints": {},
        "DirectedAcyclicGraph": {"c1": {"next": []}},
        "Lambda": 2.0,
        "Time": 1.0
    })
}

/// Cost-ladder fixture: a single edge node priced so that a cluster of
/// `n` instances costs exactly `5 · n`.
pub fn cost_ladder() -> Value {
    json!({
        "EdgeResources": {
            "computationallayer1": {
                "E": {"number": 7, "cost": 5.0, "memory": 4096.0}
            }
        },
        "FaaSResources": {},
        "Components": {
            "c1": {"s1": {"base": {"early_exit_probability": 0.0, "data_size": [0.1]}}}
        },
        "CompatibilityMatrix": {
            "c1": {"base": [{"resource": "E", "memory": 128.0}]}
        },
        "Performance": {
            "c1": {"base": {"E": {"model": "QTedge", "demand": 0.1}}}
        },
        "NetworkTechnology": {
            "ND1": {"computationalLayers": ["computationallayer1"],
                    "AccessDelay": 0.005, "Bandwidth": 100.0}
        },
        "LocalConstraints": {},
        "GlobalConstraints": {},
        "DirectedAcyclicGraph": {"c1": {"next": []}},
        "Lambda": 1.0,
        "Time": 1.0
    })
}
