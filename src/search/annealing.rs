//! Simulated annealing over placements.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::model::System;
use crate::placement::Candidate;
use crate::search::moves::propose_neighbor;
use crate::search::{improves, Budget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoolingSchedule {
    /// `T ← T · k`
    Exponential,
    /// `T ← T − k`
    Linear,
}

#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    pub temp_begin: f64,
    pub schedule_constant: f64,
    pub schedule: CoolingSchedule,
    pub min_energy: Option<f64>,
}

impl SimulatedAnnealing {
    /// Energy of a state: the cost while feasible; otherwise the raw cost
    /// inflated by the violation rate, or `+∞` when the placement is
    /// structurally broken.
    fn energy(&self, sys: &System, candidate: &Candidate) -> f64 {
        if candidate.is_feasible() {
            candidate.cost
        } else if candidate.violation_rate.is_finite() {
            candidate.raw_cost(sys) * (1.0 + candidate.violation_rate)
        } else {
            f64::INFINITY
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
        let mut current_energy = self.energy(sys, &current);
        let mut best = start;
        let mut temperature = self.temp_begin;
        let mut clock = budget.clock();

        while clock.step() {
            if let Some(floor) = self.min_energy {
                if self.energy(sys, &best) <= floor {
                    break;
                }
            }
            if let Some((neighbor, _)) = propose_neighbor(sys, &current.placement, rng) {
                let candidate = Candidate::evaluate(sys, neighbor);
                let energy = self.energy(sys, &candidate);
                if self.accept(current_energy, energy, temperature, rng) {
                    if improves(&candidate, &best) {
                        debug!(energy, temperature, "new annealing best");
                        best = candidate.clone();
                    }
                    current = candidate;
                    current_energy = energy;
                }
            }
            temperature = self.cool(temperature);
        }
        best
    }

    fn accept(&self, current: f64, neighbor: f64, temperature: f64, rng: &mut ChaCha8Rng) -> bool {
        if neighbor <= current {
            return true;
        }
        if !neighbor.is_finite() || temperature <= 0.0 {
            return false;
        }
        let delta = neighbor - current;
        rng.gen::<f64>() < (-delta / temperature).exp()
    }

    fn cool(&self, temperature: f64) -> f64 {
        let next = match self.schedule {
            CoolingSchedule::Exponential => temperature * self.schedule_constant,
            CoolingSchedule::Linear => temperature - self.schedule_constant,
        };
        next.max(f64::EPSILON)
    }
}
