//! Application components, their partitions and candidate deployments.

/// A sub-stage of a component that can be placed on a resource on its own.
#[derive(Debug, Clone)]
pub struct Partition {
    pub name: String,
    /// Data shipped to the next partition (or component), in MB.
    pub data_size: f64,
    /// Probability that this partition's output already answers the
    /// request, so downstream partitions are skipped.
    pub early_exit_probability: f64,
    /// Request arrival rate seen by this partition.
    pub part_lambda: f64,
}

/// One way of splitting a component into a contiguous pipeline of
/// partitions. Indices refer into the owning component's partition list
/// and are kept in pipeline order.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub name: String,
    pub partitions: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Component {
    pub name: String,
    pub partitions: Vec<Partition>,
    pub deployments: Vec<Deployment>,
    /// Request arrival rate seen by the component as a whole.
    pub comp_lambda: f64,
}

impl Component {
    /// Deployment that owns the given partition index.
    pub fn deployment_of(&self, partition: usize) -> Option<usize> {
        self.deployments
            .iter()
            .position(|d| d.partitions.contains(&partition))
    }

    /// Recompute partition rates from `comp_lambda`: the first partition
    /// of each deployment sees the full component rate, each subsequent
    /// one the survivors of the previous early exit.
    pub fn rechain_partition_rates(&mut self) {
        for d in &self.deployments {
            let mut rate = self.comp_lambda;
            for &h in &d.partitions {
                self.partitions[h].part_lambda = rate;
                rate *= 1.0 - self.partitions[h].early_exit_probability;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stage_component() -> Component {
        Component {
            name: "c1".into(),
            partitions: vec![
                Partition {
                    name: "h1".into(),
                    data_size: 1.0,
                    early_exit_probability: 0.25,
                    part_lambda: 0.0,
                },
                Partition {
                    name: "h2".into(),
                    data_size: 0.5,
                    early_exit_probability: 0.0,
                    part_lambda: 0.0,
                },
            ],
            deployments: vec![Deployment {
                name: "s1".into(),
                partitions: vec![0, 1],
            }],
            comp_lambda: 8.0,
        }
    }

    #[test]
    fn partition_rates_chain_through_early_exits() {
        let mut c = two_stage_component();
        c.rechain_partition_rates();
        assert_eq!(c.partitions[0].part_lambda, 8.0);
        assert_eq!(c.partitions[1].part_lambda, 6.0);
    }

    #[test]
    fn deployment_lookup() {
        let c = two_stage_component();
        assert_eq!(c.deployment_of(1), Some(0));
        assert_eq!(c.deployment_of(7), None);
    }
}
