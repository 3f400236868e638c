//! The monetary objective.
//!
//! Edge and cloud resources are billed for the whole horizon at their peak
//! cluster size; FaaS resources are billed per invocation, so the component
//! arrival rate and the warm service time enter the product.

use crate::model::System;
use crate::placement::Placement;

pub fn placement_cost(sys: &System, placement: &Placement) -> f64 {
    let horizon = sys.time_horizon();
    let peaks = placement.instance_peaks();

    let mut cost = 0.0;
    for j in 0..sys.faas_start() {
        cost += sys.resource(j).cost * peaks[j] as f64 * horizon;
    }
    for (i, h, a) in placement.cells() {
        if a.resource >= sys.faas_start() {
            cost += sys.resource(a.resource).cost
                * a.count as f64
                * sys.demand(i, h, a.resource)
                * sys.comp_lambda(i)
                * horizon;
        }
    }
    cost
}
