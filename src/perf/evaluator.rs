//! Whole-system response-time evaluation.
//!
//! Walks each component's assigned partitions in pipeline order, composing
//! per-partition service times with the network delays between consecutive
//! resources, weighted by the probability that execution actually reaches
//! that far (the complement of the accumulated early-exit probabilities).

use tracing::trace;

use crate::model::System;
use crate::placement::Placement;

/// Response time of a single partition cell. Below the FaaS boundary the
/// queueing (or regressor) model answers; FaaS partitions respond in their
/// nominal warm time.
pub fn partition_response_time(
    sys: &System,
    placement: &Placement,
    i: usize,
    h: usize,
    j: usize,
) -> f64 {
    if j < sys.faas_start() {
        match sys.model(i, h, j) {
            Some(model) => model.predict(sys, placement, i, h, j),
            None => f64::INFINITY,
        }
    } else {
        sys.demand(i, h, j)
    }
}

/// Response time of component `i` under the given placement.
pub fn component_response_time(sys: &System, placement: &Placement, i: usize) -> f64 {
    let mut total = 0.0;
    let mut reach_probability = 1.0;
    let mut prev: Option<(usize, usize)> = None;

    for (h, a) in placement.assigned(i) {
        let p = partition_response_time(sys, placement, i, h, a.resource);
        trace!(component = i, partition = h, resource = a.resource, time = p);
        match prev {
            None => total += p,
            Some((prev_h, prev_j)) => {
                let delay = if prev_j == a.resource {
                    0.0
                } else {
                    let data = sys.component(i).partitions[prev_h].data_size;
                    sys.network_delay(prev_j, a.resource, data)
                };
                total += reach_probability * (p + delay);
            }
        }
        reach_probability *= 1.0 - sys.component(i).partitions[h].early_exit_probability;
        prev = Some((h, a.resource));
    }
    total
}

/// Per-component response times, indexed densely.
pub fn compute_performance(sys: &System, placement: &Placement) -> Vec<f64> {
    (0..sys.n_components())
        .map(|i| component_response_time(sys, placement, i))
        .collect()
}

/// Per-partition response times as `(component, partition, time)`, in the
/// order the output document lists them.
pub fn partition_response_times(sys: &System, placement: &Placement) -> Vec<(usize, usize, f64)> {
    let mut times = Vec::new();
    for i in 0..sys.n_components() {
        for (h, a) in placement.assigned(i) {
            times.push((i, h, partition_response_time(sys, placement, i, h, a.resource)));
        }
    }
    times
}
