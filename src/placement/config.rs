//! Placement matrices, sparse by construction.
//!
//! Each partition row holds at most one `(resource, count)` cell, so "one
//! resource per partition" is a representation invariant rather than a
//! runtime check. Dense views (used resources, per-resource peaks) are
//! derived on demand.

use crate::model::System;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub resource: usize,
    /// Cluster size on edge/cloud; always 1 on FaaS.
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// `rows[i][h]` is the cell of partition `h` of component `i`.
    rows: Vec<Vec<Option<Assignment>>>,
    n_resources: usize,
}

impl Placement {
    pub fn empty(sys: &System) -> Self {
        Self {
            rows: sys
                .components()
                .iter()
                .map(|c| vec![None; c.partitions.len()])
                .collect(),
            n_resources: sys.n_resources(),
        }
    }

    pub fn get(&self, i: usize, h: usize) -> Option<Assignment> {
        self.rows[i][h]
    }

    pub fn set(&mut self, i: usize, h: usize, cell: Option<Assignment>) {
        self.rows[i][h] = cell;
    }

    pub fn clear_component(&mut self, i: usize) {
        for cell in &mut self.rows[i] {
            *cell = None;
        }
    }

    pub fn n_components(&self) -> usize {
        self.rows.len()
    }

    pub fn n_partitions(&self, i: usize) -> usize {
        self.rows[i].len()
    }

    /// Assigned cells of component `i` in partition (pipeline) order.
    pub fn assigned(&self, i: usize) -> impl Iterator<Item = (usize, Assignment)> + '_ {
        self.rows[i]
            .iter()
            .enumerate()
            .filter_map(|(h, cell)| cell.map(|a| (h, a)))
    }

    /// All assigned cells as `(component, partition, assignment)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Assignment)> + '_ {
        self.rows.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(h, cell)| cell.map(|a| (i, h, a)))
        })
    }

    /// Partition indices assigned for component `i`.
    pub fn assigned_partitions(&self, i: usize) -> Vec<usize> {
        self.assigned(i).map(|(h, _)| h).collect()
    }

    /// Resource of the last assigned partition of component `i`.
    pub fn last_resource(&self, i: usize) -> Option<usize> {
        self.assigned(i).last().map(|(_, a)| a.resource)
    }

    /// Binary usage vector: `true` where at least one partition runs.
    pub fn used_resources(&self) -> Vec<bool> {
        let mut used = vec![false; self.n_resources];
        for (_, _, a) in self.cells() {
            used[a.resource] = true;
        }
        used
    }

    /// Per-resource peak cluster size across all partitions (the y-bar
    /// vector driving the time-priced part of the cost function).
    pub fn instance_peaks(&self) -> Vec<u32> {
        let mut peaks = vec![0u32; self.n_resources];
        for (_, _, a) in self.cells() {
            peaks[a.resource] = peaks[a.resource].max(a.count);
        }
        peaks
    }

    /// Content order over the assigned cells. Elite pools break cost ties
    /// with this so that merges stay deterministic across runs.
    pub fn cmp_cells(&self, other: &Placement) -> std::cmp::Ordering {
        let key = |(i, h, a): (usize, usize, Assignment)| (i, h, a.resource, a.count);
        self.cells().map(key).cmp(other.cells().map(key))
    }
}

impl Placement {
    /// Test-only constructor bypassing a full system catalog.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<Vec<Option<Assignment>>>, n_resources: usize) -> Self {
        Self { rows, n_resources }
    }
}
