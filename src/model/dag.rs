//! Component DAG with per-edge transition probabilities.

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Dag {
    /// Successors of each node with the probability of taking the edge.
    next: Vec<Vec<(usize, f64)>>,
    /// Predecessors of each node.
    preds: Vec<Vec<usize>>,
    sources: Vec<usize>,
}

impl Dag {
    /// Build from `(from, to, transition_probability)` edges, rejecting
    /// cycles.
    pub fn new(nodes: usize, edges: &[(usize, usize, f64)]) -> Result<Self> {
        let mut next = vec![Vec::new(); nodes];
        let mut preds = vec![Vec::new(); nodes];
        for &(u, v, p) in edges {
            if u >= nodes || v >= nodes {
                return Err(Error::Validation(format!(
                    "DAG edge ({u}, {v}) references an unknown component"
                )));
            }
            next[u].push((v, p));
            preds[v].push(u);
        }
        let sources: Vec<usize> = (0..nodes).filter(|&n| preds[n].is_empty()).collect();
        if nodes > 0 && sources.is_empty() {
            return Err(Error::Validation("application DAG has no source".into()));
        }

        let dag = Self {
            next,
            preds,
            sources,
        };
        if dag.topological_order().len() != nodes {
            return Err(Error::Validation("application DAG contains a cycle".into()));
        }
        Ok(dag)
    }

    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    pub fn sources(&self) -> &[usize] {
        &self.sources
    }

    pub fn successors(&self, node: usize) -> &[(usize, f64)] {
        &self.next[node]
    }

    pub fn predecessors(&self, node: usize) -> &[usize] {
        &self.preds[node]
    }

    /// Breadth-first visit order from the sources. Every node appears
    /// exactly once; neighbors are queued in index order.
    pub fn bfs_order(&self) -> Vec<usize> {
        let mut visited = vec![false; self.len()];
        let mut queue: std::collections::VecDeque<usize> = self.sources.iter().copied().collect();
        for &s in &self.sources {
            visited[s] = true;
        }
        let mut order = Vec::with_capacity(self.len());
        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &(succ, _) in &self.next[node] {
                if !visited[succ] {
                    visited[succ] = true;
                    queue.push_back(succ);
                }
            }
        }
        order
    }

    fn topological_order(&self) -> Vec<usize> {
        let mut in_degree: Vec<usize> = self.preds.iter().map(|p| p.len()).collect();
        let mut queue: std::collections::VecDeque<usize> = self.sources.iter().copied().collect();
        let mut order = Vec::with_capacity(self.len());
        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &(succ, _) in &self.next[node] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    queue.push_back(succ);
                }
            }
        }
        order
    }

    /// Propagate the application arrival rate through the DAG: sources
    /// receive `lambda`, every edge scales by its transition probability,
    /// and rates sum at join nodes.
    pub fn propagate_rates(&self, lambda: f64) -> Vec<f64> {
        let mut rates = vec![0.0; self.len()];
        for &s in &self.sources {
            rates[s] = lambda;
        }
        for node in self.topological_order() {
            for &(succ, p) in &self.next[node] {
                rates[succ] += rates[node] * p;
            }
        }
        rates
    }
}
