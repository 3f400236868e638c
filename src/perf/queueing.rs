//! M/G/1 queueing for edge nodes and cloud server farms.

use crate::model::System;
use crate::placement::Placement;

/// Load factor of resource `j`: every partition served there contributes
/// its demand times its arrival rate, divided by the cluster size.
pub fn utilization(sys: &System, placement: &Placement, j: usize) -> f64 {
    let mut utilization = 0.0;
    for (i, h, a) in placement.cells() {
        if a.resource == j {
            utilization += sys.demand(i, h, j) * sys.part_lambda(i, h) / a.count as f64;
        }
    }
    utilization
}

/// M/G/1 response time of partition `(i, h)` on resource `j`.
///
/// Saturated devices (utilization ≥ 1) answer in infinite time, which the
/// feasibility battery treats as a violation rather than an error.
pub fn response_time(sys: &System, placement: &Placement, i: usize, h: usize, j: usize) -> f64 {
    let u = utilization(sys, placement, j);
    match placement.get(i, h) {
        Some(a) if a.resource == j => {
            if u >= 1.0 {
                f64::INFINITY
            } else {
                sys.demand(i, h, j) / (1.0 - u)
            }
        }
        _ => 0.0,
    }
}
