//! Evaluated candidates and the bounded K-best pool.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tracing::debug;

use crate::model::System;
use crate::placement::{check_feasibility, placement_cost, FeasibilityReport, Placement};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A placement together with its evaluation. Feasible candidates carry
/// their real cost and a zero violation rate; infeasible ones an infinite
/// cost and the (possibly infinite) violation rate, so a single
/// `(cost, violation_rate)` order ranks feasible first and infeasible by
/// closeness.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: u64,
    pub placement: Placement,
    pub cost: f64,
    pub violation_rate: f64,
    pub report: FeasibilityReport,
}

impl Candidate {
    /// Evaluate a placement: run the feasibility battery and price it.
    pub fn evaluate(sys: &System, placement: Placement) -> Self {
        let report = check_feasibility(sys, &placement);
        let (cost, violation_rate) = if report.feasible {
            (placement_cost(sys, &placement), 0.0)
        } else {
            (f64::INFINITY, report.violation_rate)
        };
        Self {
            id: NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed),
            placement,
            cost,
            violation_rate,
            report,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.report.feasible
    }

    /// Objective value ignoring feasibility, used by annealing penalties.
    pub fn raw_cost(&self, sys: &System) -> f64 {
        if self.is_feasible() {
            self.cost
        } else {
            placement_cost(sys, &self.placement)
        }
    }

    fn rank(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then(self.violation_rate.total_cmp(&other.violation_rate))
            .then_with(|| self.placement.cmp_cells(&other.placement))
    }
}

/// Bounded set of the K best candidates seen so far, sorted ascending by
/// `(cost, violation_rate)`. Below capacity every new (non-duplicate)
/// candidate is accepted; at capacity it must beat the current worst.
#[derive(Debug, Clone)]
pub struct EliteSet {
    capacity: usize,
    entries: Vec<Candidate>,
}

impl EliteSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<Candidate> {
        self.entries
    }

    pub fn has_feasible(&self) -> bool {
        self.entries.iter().any(|c| c.is_feasible())
    }

    /// Insert a candidate, keeping the set sorted, bounded and free of
    /// duplicate placements. Returns whether the candidate was kept.
    pub fn try_insert(&mut self, candidate: Candidate) -> bool {
        if self
            .entries
            .iter()
            .any(|e| e.placement == candidate.placement)
        {
            return false;
        }
        if self.entries.len() == self.capacity {
            let worst = self
                .entries
                .last()
                .expect("a full elite set cannot be empty");
            if candidate.rank(worst) != Ordering::Less {
                return false;
            }
            self.entries.pop();
        }
        let at = self
            .entries
            .partition_point(|e| e.rank(&candidate) == Ordering::Less);
        self.entries.insert(at, candidate);
        if let Some(best) = self.best() {
            debug!(
                cost = best.cost,
                violation_rate = best.violation_rate,
                size = self.entries.len(),
                "elite set updated"
            );
        }
        true
    }

    /// Fold another pool into this one, preserving the K-best order.
    pub fn merge(&mut self, other: EliteSet) {
        for candidate in other.entries {
            self.try_insert(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A candidate with a distinguishable placement so duplicate detection
    /// keys off the assignment, not the cost.
    fn fake(cost: f64, violation_rate: f64, marker: usize) -> Candidate {
        let mut rows = vec![vec![None; 16]];
        rows[0][marker] = Some(crate::placement::Assignment {
            resource: 0,
            count: 1,
        });
        let feasible = cost.is_finite();
        Candidate {
            id: NEXT_ID.fetch_add(1, AtomicOrdering::Relaxed),
            placement: Placement::from_rows(rows, 4),
            cost,
            violation_rate,
            report: FeasibilityReport {
                feasible,
                failure: None,
                component_times: Vec::new(),
                path_times: Vec::new(),
                response_times: Vec::new(),
                violation_rate,
            },
        }
    }

    #[test]
    fn keeps_k_smallest() {
        let mut pool = EliteSet::new(3);
        for (m, cost) in [30.0, 10.0, 40.0, 20.0].into_iter().enumerate() {
            pool.try_insert(fake(cost, 0.0, m));
        }
        let costs: Vec<f64> = pool.iter().map(|c| c.cost).collect();
        assert_eq!(costs, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn accepts_into_empty_pool() {
        // A pool below capacity must accept without consulting a worst
        // element that does not exist.
        let mut pool = EliteSet::new(2);
        assert!(pool.try_insert(fake(99.0, 0.0, 0)));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn rejects_duplicate_placements() {
        let mut pool = EliteSet::new(4);
        assert!(pool.try_insert(fake(10.0, 0.0, 1)));
        assert!(!pool.try_insert(fake(10.0, 0.0, 1)));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn feasible_sorts_before_infeasible() {
        let mut pool = EliteSet::new(3);
        pool.try_insert(fake(f64::INFINITY, 0.4, 0));
        pool.try_insert(fake(25.0, 0.0, 1));
        pool.try_insert(fake(f64::INFINITY, 0.1, 2));
        let best = pool.best().unwrap();
        assert_eq!(best.cost, 25.0);
        // infeasible entries rank by violation rate
        assert_eq!(pool.iter().nth(1).unwrap().violation_rate, 0.1);
    }

    #[test]
    fn merge_keeps_the_k_smallest_of_both() {
        let mut a = EliteSet::new(4);
        for (m, cost) in [10.0, 20.0, 30.0].into_iter().enumerate() {
            a.try_insert(fake(cost, 0.0, m));
        }
        let mut b = EliteSet::new(4);
        for (m, cost) in [15.0, 25.0, 35.0].into_iter().enumerate() {
            b.try_insert(fake(cost, 0.0, m + 8));
        }
        a.merge(b);
        let costs: Vec<f64> = a.iter().map(|c| c.cost).collect();
        assert_eq!(costs, vec![10.0, 15.0, 20.0, 25.0]);
    }
}
