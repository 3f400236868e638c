//! Solution documents.
//!
//! The main document describes the chosen deployment, per-partition and
//! per-component response times and the total cost. When the final
//! placement is infeasible, a companion `<Lambda>_infeasible.json` is
//! written next to it with the violating parts and per-resource
//! utilizations.

use std::path::Path;

use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::{Error, Result};
use crate::model::System;
use crate::perf::{evaluator, queueing};
use crate::placement::Candidate;

/// Encode a possibly unbounded time the way the documents expect.
fn time_value(t: f64) -> Value {
    if t.is_finite() && t >= 0.0 {
        json!(t)
    } else {
        json!("inf")
    }
}

fn description_value(description: &Option<String>) -> Value {
    match description {
        Some(d) => json!(d),
        None => Value::Null,
    }
}

/// Resource block for one placement cell: identity, billing and sizing.
fn resource_block(sys: &System, j: usize, count: u32) -> Value {
    let resource = sys.resource(j);
    let mut block = Map::new();
    block.insert("description".into(), description_value(&resource.description));
    block.insert("cost".into(), json!(resource.cost * count as f64));
    block.insert("memory".into(), json!(resource.memory));
    if j < sys.faas_start() {
        block.insert("number".into(), json!(count));
    } else {
        block.insert(
            "idle_time_before_kill".into(),
            json!(resource.idle_time_before_kill),
        );
        block.insert("transition_cost".into(), json!(resource.transition_cost));
    }
    Value::Object(block)
}

fn component_block(
    sys: &System,
    candidate: &Candidate,
    i: usize,
    partition_times: &[(usize, usize, f64)],
    response_time: f64,
) -> Option<Value> {
    let component = sys.component(i);
    let (first_h, _) = candidate.placement.assigned(i).next()?;
    let deployment = &component.deployments[component.deployment_of(first_h)?];

    let mut partitions = Map::new();
    for (h, a) in candidate.placement.assigned(i) {
        let resource = sys.resource(a.resource);
        let layer = sys.layer_name(resource.layer);
        let time = partition_times
            .iter()
            .find(|(pi, ph, _)| *pi == i && *ph == h)
            .map(|(_, _, t)| *t)
            .unwrap_or(f64::INFINITY);

        let mut on_resource = Map::new();
        on_resource.insert(resource.name.clone(), resource_block(sys, a.resource, a.count));
        let mut entry = Map::new();
        entry.insert(layer.to_string(), Value::Object(on_resource));
        entry.insert("response_time".into(), time_value(time));
        partitions.insert(component.partitions[h].name.clone(), Value::Object(entry));
    }

    let threshold = sys
        .local_constraint_of(i)
        .map(|lc| json!(lc.max_response_time))
        .unwrap_or_else(|| json!("inf"));

    let mut block = Map::new();
    block.insert(deployment.name.clone(), Value::Object(partitions));
    block.insert("response_time".into(), time_value(response_time));
    block.insert("response_time_threshold".into(), threshold);
    Some(Value::Object(block))
}

/// The main solution document (§ output contract).
pub fn solution_document(sys: &System, candidate: &Candidate) -> Value {
    let partition_times = evaluator::partition_response_times(sys, &candidate.placement);
    let response_times = if candidate.report.response_times.is_empty() {
        evaluator::compute_performance(sys, &candidate.placement)
    } else {
        candidate.report.response_times.clone()
    };

    let mut components = Map::new();
    for i in 0..sys.n_components() {
        if let Some(block) =
            component_block(sys, candidate, i, &partition_times, response_times[i])
        {
            components.insert(sys.component(i).name.clone(), block);
        }
    }

    let mut globals = Map::new();
    for (idx, gc) in sys.global_constraints().iter().enumerate() {
        let names: Vec<&str> = gc
            .components
            .iter()
            .map(|&i| sys.component(i).name.as_str())
            .collect();
        let time = candidate
            .report
            .path_times
            .get(idx)
            .map(|o| o.time)
            .unwrap_or_else(|| gc.path_time(&response_times));
        globals.insert(
            gc.path_name.clone(),
            json!({
                "components": names,
                "path_response_time": time_value(time),
            }),
        );
    }

    json!({
        "Lambda": sys.lambda(),
        "components": Value::Object(components),
        "global_constraints": Value::Object(globals),
        "total_cost": if candidate.cost.is_finite() { json!(candidate.cost) } else { json!("inf") },
        "feasible": candidate.is_feasible(),
    })
}

/// Companion document for infeasible outcomes: the violating components
/// and paths plus the utilization of every loaded device.
pub fn infeasible_document(sys: &System, candidate: &Candidate) -> Value {
    let partition_times = evaluator::partition_response_times(sys, &candidate.placement);
    let response_times = if candidate.report.response_times.is_empty() {
        evaluator::compute_performance(sys, &candidate.placement)
    } else {
        candidate.report.response_times.clone()
    };

    let mut components = Map::new();
    for i in 0..sys.n_components() {
        let violated = candidate
            .report
            .component_times
            .get(i)
            .map(|o| !o.ok)
            .unwrap_or(false)
            || !response_times[i].is_finite();
        if !violated {
            continue;
        }
        if let Some(block) =
            component_block(sys, candidate, i, &partition_times, response_times[i])
        {
            components.insert(sys.component(i).name.clone(), block);
        }
    }

    let mut doc = Map::new();
    doc.insert("Lambda".into(), json!(sys.lambda()));
    doc.insert("components".into(), Value::Object(components));

    let any_path_violated = candidate.report.path_times.iter().any(|o| !o.ok);
    if any_path_violated {
        let mut globals = Map::new();
        for (idx, gc) in sys.global_constraints().iter().enumerate() {
            let outcome = &candidate.report.path_times[idx];
            let names: Vec<&str> = gc
                .components
                .iter()
                .map(|&i| sys.component(i).name.as_str())
                .collect();
            globals.insert(
                gc.path_name.clone(),
                json!({
                    "components": names,
                    "path_response_time": time_value(outcome.time),
                }),
            );
        }
        doc.insert("global_constraints".into(), Value::Object(globals));
    }

    let peaks = candidate.placement.instance_peaks();
    let mut resources = Map::new();
    for j in 0..sys.faas_start() {
        let utilization = queueing::utilization(sys, &candidate.placement, j);
        if utilization > 0.0 {
            let resource = sys.resource(j);
            resources.insert(
                resource.name.clone(),
                json!({
                    "description": description_value(&resource.description),
                    "number": peaks[j],
                    "utilization": utilization,
                }),
            );
        }
    }
    if !resources.is_empty() {
        doc.insert("Resources".into(), Value::Object(resources));
    }
    Value::Object(doc)
}

/// Write the solution document, plus the infeasible companion when needed.
pub fn write_solution(sys: &System, candidate: &Candidate, path: &Path) -> Result<()> {
    let document = solution_document(sys, candidate);
    let text = serde_json::to_string_pretty(&document)?;
    std::fs::write(path, text)
        .map_err(|e| Error::MissingInput(format!("{}: {e}", path.display())))?;
    info!(path = %path.display(), feasible = candidate.is_feasible(), "solution written");

    if !candidate.is_feasible() {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let companion = parent.join(format!("{}_infeasible.json", sys.lambda()));
        let text = serde_json::to_string_pretty(&infeasible_document(sys, candidate))?;
        std::fs::write(&companion, text)
            .map_err(|e| Error::MissingInput(format!("{}: {e}", companion.display())))?;
        info!(path = %companion.display(), "infeasible details written");
    }
    Ok(())
}
