//! Binary search for the largest sustainable workload rate.
//!
//! The topology found by the heuristics is frozen: every probe re-derives
//! the arrival rates for the trial rate and re-runs the feasibility
//! battery on the unchanged placement.

use tracing::{debug, info};

use crate::model::System;
use crate::placement::{Candidate, Placement};

#[derive(Debug, Clone)]
pub struct WorkloadMaximizer {
    pub upper_bound_lambda: f64,
    pub epsilon: f64,
}

impl WorkloadMaximizer {
    /// Returns the largest rate within `epsilon` at which the placement
    /// stays feasible, together with its evaluation under that rate. When
    /// the placement is already infeasible at the current rate, that rate
    /// and the failing evaluation are returned unchanged.
    pub fn maximize(&self, sys: &System, placement: &Placement) -> (f64, Candidate) {
        let mut lo = sys.lambda();
        let mut hi = self.upper_bound_lambda.max(lo);
        let mut best = (lo, Candidate::evaluate(sys, placement.clone()));
        if !best.1.is_feasible() {
            info!(lambda = lo, "placement infeasible at its own rate");
            return best;
        }

        while hi - lo > self.epsilon {
            let mid = 0.5 * (lo + hi);
            if mid <= lo || mid >= hi {
                // No representable rate strictly between the bounds.
                break;
            }
            let scaled = sys.scaled_to(mid);
            let candidate = Candidate::evaluate(&scaled, placement.clone());
            debug!(mid, feasible = candidate.is_feasible(), "probe");
            if candidate.is_feasible() {
                lo = mid;
                best = (mid, candidate);
            } else {
                hi = mid;
            }
        }
        info!(lambda = best.0, "maximum sustainable rate found");
        best
    }
}
