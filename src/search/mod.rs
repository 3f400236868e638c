//! Search engine: constructive generation, neighborhood exploration,
//! parallel driving and the workload-rate binary search.

mod annealing;
mod binsearch;
mod driver;
mod genetic;
mod greedy;
mod local;
pub mod moves;
mod tabu;

pub use annealing::{CoolingSchedule, SimulatedAnnealing};
pub use binsearch::WorkloadMaximizer;
pub use driver::ParallelDriver;
pub use genetic::GeneticAlgorithm;
pub use greedy::RandomGreedy;
pub use local::LocalSearch;
pub use tabu::TabuSearch;

use std::time::{Duration, Instant};

use rand_chacha::ChaCha8Rng;

use crate::model::System;
use crate::placement::{Candidate, EliteSet};

/// Iteration and wall-clock budget of one algorithm run. At least one of
/// the two limits is always present (the configuration layer enforces it).
#[derive(Debug, Clone, Copy)]
pub struct Budget {
    pub max_steps: Option<u64>,
    pub max_time: Option<Duration>,
}

impl Budget {
    pub fn new(max_steps: Option<u64>, max_time: Option<Duration>) -> Self {
        Self {
            max_steps,
            max_time,
        }
    }

    /// Budget of worker `r` out of `workers`: iterations split evenly with
    /// the remainder spread over the first workers, time split evenly.
    pub fn share(&self, workers: usize, r: usize) -> Budget {
        let workers = workers.max(1) as u64;
        let r = r as u64;
        Budget {
            max_steps: self.max_steps.map(|steps| {
                let each = steps / workers;
                if r < steps % workers {
                    each + 1
                } else {
                    each
                }
            }),
            max_time: self.max_time.map(|t| t / workers as u32),
        }
    }

    /// Split evenly across `parts` sequential runs (e.g. one run per
    /// starting point).
    pub fn divide(&self, parts: usize) -> Budget {
        let parts = parts.max(1);
        Budget {
            max_steps: self.max_steps.map(|s| (s / parts as u64).max(1)),
            max_time: self.max_time.map(|t| t / parts as u32),
        }
    }

    pub fn clock(&self) -> BudgetClock {
        BudgetClock {
            deadline: self.max_time.map(|t| Instant::now() + t),
            remaining_steps: self.max_steps,
        }
    }
}

/// Running countdown over a [`Budget`].
#[derive(Debug)]
pub struct BudgetClock {
    deadline: Option<Instant>,
    remaining_steps: Option<u64>,
}

impl BudgetClock {
    /// Consume one step. Returns `false` once either limit is exhausted.
    pub fn step(&mut self) -> bool {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return false;
            }
        }
        match &mut self.remaining_steps {
            Some(0) => false,
            Some(steps) => {
                *steps -= 1;
                true
            }
            None => true,
        }
    }
}

/// Strict `(cost, violation_rate)` improvement: cheaper when feasible,
/// closer to feasibility otherwise.
pub(crate) fn improves(candidate: &Candidate, incumbent: &Candidate) -> bool {
    matches!(
        candidate
            .cost
            .total_cmp(&incumbent.cost)
            .then(candidate.violation_rate.total_cmp(&incumbent.violation_rate)),
        std::cmp::Ordering::Less
    )
}

/// The heuristic chosen by the run configuration; at most one per run.
#[derive(Debug, Clone)]
pub enum HeuristicSpec {
    LocalSearch(LocalSearch),
    TabuSearch(TabuSearch),
    SimulatedAnnealing(SimulatedAnnealing),
    Genetic(GeneticAlgorithm),
}

impl HeuristicSpec {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LocalSearch(_) => "LS",
            Self::TabuSearch(_) => "TS",
            Self::SimulatedAnnealing(_) => "SA",
            Self::Genetic(_) => "GA",
        }
    }

    /// Refine a batch of seeds. The genetic algorithm consumes the batch
    /// as its population; the trajectory methods run once per seed on an
    /// evenly divided budget. Returns the best result found.
    pub fn refine(
        &self,
        sys: &System,
        seeds: &[Candidate],
        budget: &Budget,
        rng: &mut ChaCha8Rng,
    ) -> EliteSet {
        let mut pool = EliteSet::new(1);
        match self {
            Self::Genetic(ga) => {
                pool.try_insert(ga.run(sys, seeds, budget, rng));
            }
            _ => {
                let per_seed = budget.divide(seeds.len());
                for seed in seeds {
                    let refined = match self {
                        Self::LocalSearch(ls) => ls.run(sys, seed.clone(), &per_seed, rng),
                        Self::TabuSearch(ts) => ts.run(sys, seed.clone(), &per_seed, rng),
                        Self::SimulatedAnnealing(sa) => {
                            sa.run(sys, seed.clone(), &per_seed, rng)
                        }
                        Self::Genetic(_) => unreachable!(),
                    };
                    pool.try_insert(refined);
                }
            }
        }
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_share_spreads_the_remainder() {
        let budget = Budget::new(Some(10), Some(Duration::from_secs(8)));
        let first = budget.share(4, 0);
        let last = budget.share(4, 3);
        assert_eq!(first.max_steps, Some(3));
        assert_eq!(last.max_steps, Some(2));
        assert_eq!(first.max_time, Some(Duration::from_secs(2)));
    }

    #[test]
    fn clock_counts_steps_down() {
        let budget = Budget::new(Some(2), None);
        let mut clock = budget.clock();
        assert!(clock.step());
        assert!(clock.step());
        assert!(!clock.step());
    }

    #[test]
    fn clock_honors_deadline() {
        let budget = Budget::new(None, Some(Duration::from_millis(0)));
        let mut clock = budget.clock();
        assert!(!clock.step());
    }
}
