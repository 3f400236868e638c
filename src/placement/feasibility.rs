//! The feasibility battery.
//!
//! Checks run cheapest-first and short-circuit on the first structural
//! failure. Response-time checks are evaluated in full so that infeasible
//! candidates can be ranked by how badly they miss their bounds.

use tracing::trace;

use crate::model::System;
use crate::perf::{evaluator, queueing};
use crate::placement::Placement;

/// Category of the first failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infeasibility {
    AssignmentShape,
    Compatibility,
    InstanceCap,
    Colocation,
    Utilization,
    Memory,
    MoveBackward,
    LocalConstraint,
    GlobalConstraint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintOutcome {
    pub ok: bool,
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeasibilityReport {
    pub feasible: bool,
    pub failure: Option<Infeasibility>,
    /// One outcome per component; unconstrained components are trivially ok.
    pub component_times: Vec<ConstraintOutcome>,
    /// One outcome per global constraint, in declaration order.
    pub path_times: Vec<ConstraintOutcome>,
    /// Dense per-component response times; empty when a structural check
    /// failed before performance was evaluated.
    pub response_times: Vec<f64>,
    /// Normalized sum of bound excesses; 0 when feasible, `+∞` on
    /// structural failures.
    pub violation_rate: f64,
}

impl FeasibilityReport {
    fn structural(sys: &System, failure: Infeasibility) -> Self {
        Self {
            feasible: false,
            failure: Some(failure),
            component_times: vec![
                ConstraintOutcome {
                    ok: true,
                    time: f64::INFINITY
                };
                sys.n_components()
            ],
            path_times: Vec::new(),
            response_times: Vec::new(),
            violation_rate: f64::INFINITY,
        }
    }
}

/// Run the whole battery on a candidate placement.
pub fn check_feasibility(sys: &System, placement: &Placement) -> FeasibilityReport {
    if let Some(failure) = structural_failure(sys, placement) {
        trace!(?failure, "structural check failed");
        return FeasibilityReport::structural(sys, failure);
    }
    performance_report(sys, placement)
}

fn structural_failure(sys: &System, placement: &Placement) -> Option<Infeasibility> {
    if !assignment_shape_ok(sys, placement) {
        return Some(Infeasibility::AssignmentShape);
    }
    if !compatibility_ok(sys, placement) {
        return Some(Infeasibility::Compatibility);
    }
    if !instance_cap_ok(sys, placement) {
        return Some(Infeasibility::InstanceCap);
    }
    if let Some(failure) = colocation_failure(sys, placement) {
        return Some(failure);
    }
    if !memory_ok(sys, placement) {
        return Some(Infeasibility::Memory);
    }
    if !move_backward_ok(sys, placement) {
        return Some(Infeasibility::MoveBackward);
    }
    None
}

/// Every component runs exactly the partitions of one of its deployments,
/// every cell carries at least one instance, and FaaS cells exactly one.
fn assignment_shape_ok(sys: &System, placement: &Placement) -> bool {
    for (i, component) in sys.components().iter().enumerate() {
        let assigned = placement.assigned_partitions(i);
        if assigned.is_empty() {
            return false;
        }
        if !component
            .deployments
            .iter()
            .any(|d| d.partitions == assigned)
        {
            return false;
        }
        for (_, a) in placement.assigned(i) {
            if a.count == 0 {
                return false;
            }
            if a.resource >= sys.faas_start() && a.count != 1 {
                return false;
            }
        }
    }
    true
}

fn compatibility_ok(sys: &System, placement: &Placement) -> bool {
    placement
        .cells()
        .all(|(i, h, a)| sys.compatible(i, h, a.resource))
}

fn instance_cap_ok(sys: &System, placement: &Placement) -> bool {
    placement
        .instance_peaks()
        .iter()
        .enumerate()
        .all(|(j, &peak)| peak <= sys.resource(j).max_instances)
}

/// Non-FaaS devices hosting several partitions need every model's consent
/// to colocation; every used non-FaaS device must stay below saturation.
fn colocation_failure(sys: &System, placement: &Placement) -> Option<Infeasibility> {
    for j in 0..sys.faas_start() {
        let mut hosted = 0usize;
        let mut colocation_allowed = true;
        for (i, h, a) in placement.cells() {
            if a.resource == j {
                hosted += 1;
                if let Some(model) = sys.model(i, h, j) {
                    colocation_allowed &= model.allows_colocation();
                }
            }
        }
        if hosted > 1 && !colocation_allowed {
            return Some(Infeasibility::Colocation);
        }
        if hosted > 0 && queueing::utilization(sys, placement, j) >= 1.0 {
            return Some(Infeasibility::Utilization);
        }
    }
    None
}

/// Memory is occupancy-based: a partition claims its requirement on a
/// device once, independent of the cluster size.
fn memory_ok(sys: &System, placement: &Placement) -> bool {
    let mut load = vec![0.0f64; sys.n_resources()];
    for (i, h, a) in placement.cells() {
        load[a.resource] += sys.memory_req(i, h, a.resource);
        if load[a.resource] > sys.resource(a.resource).memory {
            return false;
        }
    }
    true
}

/// Once execution reaches a cloud or FaaS index, no later partition on any
/// DAG path may fall back to an edge index. The predecessor context is the
/// maximum last-placed index over all predecessors.
fn move_backward_ok(sys: &System, placement: &Placement) -> bool {
    let cloud_start = sys.cloud_start();
    for i in sys.dag().bfs_order() {
        let mut last: Option<usize> = sys
            .dag()
            .predecessors(i)
            .iter()
            .filter_map(|&pred| placement.last_resource(pred))
            .filter(|&j| j >= cloud_start)
            .max();
        for (_, a) in placement.assigned(i) {
            if let Some(prev) = last {
                if prev >= cloud_start && a.resource < cloud_start {
                    return false;
                }
            }
            last = Some(a.resource);
        }
    }
    true
}

fn performance_report(sys: &System, placement: &Placement) -> FeasibilityReport {
    let response_times = evaluator::compute_performance(sys, placement);

    let mut component_times = vec![
        ConstraintOutcome {
            ok: true,
            time: f64::INFINITY
        };
        sys.n_components()
    ];
    let mut violation = 0.0f64;
    let mut local_ok = true;
    for lc in sys.local_constraints() {
        let time = response_times[lc.component];
        let ok = time <= lc.max_response_time;
        component_times[lc.component] = ConstraintOutcome { ok, time };
        if !ok {
            local_ok = false;
            violation += (time - lc.max_response_time) / lc.max_response_time;
        }
    }

    let mut path_times = Vec::with_capacity(sys.global_constraints().len());
    let mut global_ok = true;
    for gc in sys.global_constraints() {
        let time = gc.path_time(&response_times);
        let ok = time <= gc.max_response_time;
        if !ok {
            global_ok = false;
            violation += (time - gc.max_response_time) / gc.max_response_time;
        }
        path_times.push(ConstraintOutcome { ok, time });
    }

    let feasible = local_ok && global_ok;
    let failure = if feasible {
        None
    } else if !local_ok {
        Some(Infeasibility::LocalConstraint)
    } else {
        Some(Infeasibility::GlobalConstraint)
    };
    FeasibilityReport {
        feasible,
        failure,
        component_times,
        path_times,
        response_times,
        violation_rate: if feasible {
            0.0
        } else if violation.is_finite() {
            violation
        } else {
            f64::INFINITY
        },
    }
}
