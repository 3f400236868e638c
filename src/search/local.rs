//! First-improvement local search.

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::model::System;
use crate::placement::Candidate;
use crate::search::moves::propose_neighbor;
use crate::search::{improves, Budget};

#[derive(Debug, Clone)]
pub struct LocalSearch {
    /// Stop as soon as the incumbent cost reaches this score.
    pub min_score: Option<f64>,
    /// Give up after this many consecutive non-improving neighbors.
    pub max_no_improve: u64,
}

impl LocalSearch {
    pub fn new(min_score: Option<f64>) -> Self {
        Self {
            min_score,
            max_no_improve: 200,
        }
    }

    pub fn run(
        &self,
        sys: &System,
        start: Candidate,
        budget: &Budget,
        rng: &mut ChaCha8Rng,
    ) -> Candidate {
        let mut current = start;
        let mut clock = budget.clock();
        let mut stale = 0u64;
        while clock.step() {
            if let Some(target) = self.min_score {
                if current.cost <= target {
                    break;
                }
            }
            if stale >= self.max_no_improve {
                break;
            }
            let Some((neighbor, _)) = propose_neighbor(sys, &current.placement, rng) else {
                stale += 1;
                continue;
            };
            let candidate = Candidate::evaluate(sys, neighbor);
            if improves(&candidate, &current) {
                debug!(cost = candidate.cost, "descent step");
                current = candidate;
                stale = 0;
            } else {
                stale += 1;
            }
        }
        current
    }
}
