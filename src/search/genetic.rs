//! Generational genetic algorithm over placements.
//!
//! Chromosomes are whole placements; the crossover cut runs along the
//! component axis. Each budget step is one generation.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::model::System;
use crate::placement::{Candidate, Placement};
use crate::search::moves::{mutate_component, reduce_all_clusters};
use crate::search::{improves, Budget};

#[derive(Debug, Clone)]
pub struct GeneticAlgorithm {
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub min_fitness: Option<f64>,
}

impl GeneticAlgorithm {
    pub fn run(
        &self,
        sys: &System,
        seeds: &[Candidate],
        budget: &Budget,
        rng: &mut ChaCha8Rng,
    ) -> Candidate {
        let mut population: Vec<Candidate> = seeds.to_vec();
        if population.is_empty() {
            return Candidate::evaluate(sys, Placement::empty(sys));
        }
        while population.len() < 2 {
            population.push(population[0].clone());
        }
        let mut best = population
            .iter()
            .cloned()
            .reduce(|a, b| if improves(&b, &a) { b } else { a })
            .expect("population is non-empty");

        let mut clock = budget.clock();
        let mut generation = 0u64;
        while clock.step() {
            if let Some(target) = self.min_fitness {
                if best.cost <= target {
                    break;
                }
            }
            generation += 1;
            let mut next = Vec::with_capacity(population.len());
            for _ in 0..population.len() {
                let parent_a = tournament(&population, rng);
                let parent_b = tournament(&population, rng);
                let mut child = if rng.gen::<f64>() < self.crossover_rate {
                    crossover(sys, parent_a, parent_b, rng)
                } else if improves(parent_b, parent_a) {
                    parent_b.placement.clone()
                } else {
                    parent_a.placement.clone()
                };
                for i in 0..sys.n_components() {
                    if rng.gen::<f64>() < self.mutation_rate {
                        mutate_component(sys, &mut child, i, rng);
                    }
                }
                reduce_all_clusters(sys, &mut child);
                let candidate = Candidate::evaluate(sys, child);
                if improves(&candidate, &best) {
                    debug!(generation, cost = candidate.cost, "new genetic best");
                    best = candidate.clone();
                }
                next.push(candidate);
            }
            // Elitism: the global best always survives the generation.
            if !next.iter().any(|c| c.placement == best.placement) {
                if let Some(worst) = worst_index(&next) {
                    next[worst] = best.clone();
                }
            }
            population = next;
        }
        best
    }
}

/// Binary tournament: two uniform picks, the fitter one wins.
fn tournament<'a>(population: &'a [Candidate], rng: &mut ChaCha8Rng) -> &'a Candidate {
    let a = &population[rng.gen_range(0..population.len())];
    let b = &population[rng.gen_range(0..population.len())];
    if improves(b, a) {
        b
    } else {
        a
    }
}

/// Single-point crossover on the component axis: the child runs components
/// `[0, k)` exactly as the first parent does and `[k, I)` as the second.
fn crossover(
    sys: &System,
    parent_a: &Candidate,
    parent_b: &Candidate,
    rng: &mut ChaCha8Rng,
) -> Placement {
    let components = sys.n_components();
    if components < 2 {
        return parent_a.placement.clone();
    }
    let k = rng.gen_range(1..components);
    let mut child = parent_a.placement.clone();
    for i in k..components {
        child.clear_component(i);
        for (h, a) in parent_b.placement.assigned(i) {
            child.set(i, h, Some(a));
        }
    }
    child
}

fn worst_index(population: &[Candidate]) -> Option<usize> {
    let mut worst: Option<usize> = None;
    for (idx, candidate) in population.iter().enumerate() {
        match worst {
            None => worst = Some(idx),
            Some(w) if improves(&population[w], candidate) => worst = Some(idx),
            _ => {}
        }
    }
    worst
}
