//! Parallel driver: shards budgets, seeds and starting points across a
//! rayon pool of workers and merges the resulting K-best pools.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::model::System;
use crate::placement::{Candidate, EliteSet};
use crate::search::{Budget, HeuristicSpec, RandomGreedy};

#[derive(Debug, Clone)]
pub struct ParallelDriver {
    workers: usize,
    seed: u64,
}

impl ParallelDriver {
    pub fn new(workers: usize, seed: u64) -> Self {
        Self {
            workers: workers.max(1),
            seed,
        }
    }

    /// One worker per available core.
    pub fn with_all_cores(seed: u64) -> Self {
        Self::new(num_cpus::get(), seed)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Worker RNG streams derive deterministically from the base seed,
    /// the worker count and the worker index.
    fn worker_rng(&self, r: usize) -> ChaCha8Rng {
        let c = self.workers as u64;
        let r = r as u64;
        ChaCha8Rng::seed_from_u64(self.seed.wrapping_mul(c * c).wrapping_mul(r * r))
    }

    fn pool(&self) -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("search-worker-{}", i))
            .build()
            .unwrap_or_else(|e| {
                warn!("falling back to a single-threaded pool: {e}");
                rayon::ThreadPoolBuilder::new()
                    .num_threads(1)
                    .build()
                    .expect("a one-thread pool always builds")
            })
    }

    /// Run the randomized greedy on every worker and merge the pools.
    pub fn run_greedy(&self, sys: &System, greedy: &RandomGreedy, budget: &Budget) -> EliteSet {
        info!(workers = self.workers, "starting randomized greedy");
        let results: Vec<EliteSet> = self.pool().install(|| {
            (0..self.workers)
                .into_par_iter()
                .map(|r| {
                    let mut rng = self.worker_rng(r);
                    greedy.run(sys, &budget.share(self.workers, r), &mut rng)
                })
                .collect()
        });
        let mut merged = EliteSet::new(greedy.elite_capacity);
        for pool in results {
            merged.merge(pool);
        }
        merged
    }

    /// Distribute starting points round-robin and refine them in parallel.
    pub fn run_heuristic(
        &self,
        sys: &System,
        spec: &HeuristicSpec,
        seeds: &[Candidate],
        budget: &Budget,
    ) -> EliteSet {
        info!(
            workers = self.workers,
            method = spec.name(),
            seeds = seeds.len(),
            "starting heuristic"
        );
        let shards: Vec<Vec<Candidate>> = (0..self.workers)
            .map(|r| {
                seeds
                    .iter()
                    .skip(r)
                    .step_by(self.workers)
                    .cloned()
                    .collect()
            })
            .collect();
        let results: Vec<EliteSet> = self.pool().install(|| {
            shards
                .into_par_iter()
                .enumerate()
                .map(|(r, shard)| {
                    if shard.is_empty() {
                        return EliteSet::new(1);
                    }
                    let mut rng = self.worker_rng(r);
                    spec.refine(sys, &shard, &budget.share(self.workers, r), &mut rng)
                })
                .collect()
        });
        let mut merged = EliteSet::new(1);
        for pool in results {
            merged.merge(pool);
        }
        merged
    }
}
