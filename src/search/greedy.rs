//! Constructive randomized greedy generation of seed placements.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use tracing::debug;

use crate::model::System;
use crate::placement::{Candidate, EliteSet, Placement};
use crate::search::moves::{assign_deployment, reduce_all_clusters};
use crate::search::Budget;

#[derive(Debug, Clone)]
pub struct RandomGreedy {
    /// K of the K-best pool handed to the heuristics.
    pub elite_capacity: usize,
    /// Redraws allowed per iteration before settling for the closest
    /// infeasible configuration.
    pub max_retries: u32,
}

impl RandomGreedy {
    pub fn new(elite_capacity: usize) -> Self {
        Self {
            elite_capacity,
            max_retries: 10,
        }
    }

    /// Run until the budget is exhausted, returning the K-best pool.
    /// While no feasible placement has been seen the pool ranks drawn
    /// configurations by violation rate, so the caller always gets the
    /// closest miss when the space turns out to be infeasible.
    pub fn run(&self, sys: &System, budget: &Budget, rng: &mut ChaCha8Rng) -> EliteSet {
        let mut pool = EliteSet::new(self.elite_capacity);
        let mut clock = budget.clock();
        let mut iterations = 0u64;
        while clock.step() {
            iterations += 1;
            pool.try_insert(self.iteration(sys, rng));
        }
        debug!(
            iterations,
            feasible = pool.has_feasible(),
            best_cost = pool.best().map(|c| c.cost),
            "randomized greedy finished"
        );
        pool
    }

    fn iteration(&self, sys: &System, rng: &mut ChaCha8Rng) -> Candidate {
        let mut closest_miss: Option<Candidate> = None;
        for _ in 0..=self.max_retries {
            let Some(placement) = self.random_placement(sys, rng) else {
                continue;
            };
            let candidate = Candidate::evaluate(sys, placement);
            if candidate.is_feasible() {
                let mut reduced = candidate.placement;
                reduce_all_clusters(sys, &mut reduced);
                return Candidate::evaluate(sys, reduced);
            }
            closest_miss = Some(match closest_miss.take() {
                Some(best) if best.violation_rate <= candidate.violation_rate => best,
                _ => candidate,
            });
        }
        closest_miss.unwrap_or_else(|| Candidate::evaluate(sys, Placement::empty(sys)))
    }

    /// One uniform draw: permute components, pick a deployment per
    /// component and a compatible resource (with a random cluster size on
    /// edge/cloud) per partition.
    fn random_placement(&self, sys: &System, rng: &mut ChaCha8Rng) -> Option<Placement> {
        let mut placement = Placement::empty(sys);
        let mut order: Vec<usize> = (0..sys.n_components()).collect();
        order.shuffle(rng);
        for i in order {
            let dep = rng.gen_range(0..sys.component(i).deployments.len());
            if !assign_deployment(sys, &mut placement, i, dep, rng) {
                return None;
            }
        }
        Some(placement)
    }
}
