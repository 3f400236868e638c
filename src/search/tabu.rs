//! Tabu search: first-improvement descent with a FIFO memory of recent
//! move signatures and an aspiration override for new global bests.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::model::System;
use crate::placement::Candidate;
use crate::search::moves::{propose_neighbor, MoveSignature};
use crate::search::{improves, Budget};

#[derive(Debug, Clone)]
pub struct TabuSearch {
    pub tabu_size: usize,
    pub min_score: Option<f64>,
    pub max_no_improve: u64,
}

impl TabuSearch {
    pub fn new(tabu_size: usize, min_score: Option<f64>) -> Self {
        Self {
            tabu_size,
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
        let mut current = start.clone();
        let mut best = start;
        let mut tabu: VecDeque<MoveSignature> = VecDeque::with_capacity(self.tabu_size);
        let mut clock = budget.clock();
        let mut stale = 0u64;

        while clock.step() {
            if let Some(target) = self.min_score {
                if best.cost <= target {
                    break;
                }
            }
            if stale >= self.max_no_improve {
                break;
            }
            let Some((neighbor, signature)) = propose_neighbor(sys, &current.placement, rng)
            else {
                stale += 1;
                continue;
            };
            let candidate = Candidate::evaluate(sys, neighbor);

            // Aspiration: a tabu move may still produce a new global best.
            let aspires = candidate.cost < best.cost;
            if tabu.contains(&signature) && !aspires {
                stale += 1;
                continue;
            }

            if improves(&candidate, &current) {
                if self.tabu_size > 0 {
                    if tabu.len() == self.tabu_size {
                        tabu.pop_front();
                    }
                    tabu.push_back(signature);
                }
                current = candidate;
                stale = 0;
                if improves(&current, &best) {
                    debug!(cost = current.cost, "new tabu best");
                    best = current.clone();
                }
            } else {
                stale += 1;
            }
        }
        best
    }
}
