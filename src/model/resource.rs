//! Computational resources: edge nodes, cloud virtual machines and
//! serverless functions.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Edge,
    Cloud,
    Faas,
}

#[derive(Debug, Clone)]
pub struct Resource {
    pub name: String,
    pub kind: ResourceKind,
    /// Index of the computational layer the resource belongs to.
    pub layer: usize,
    /// Monetary cost per time unit (edge/cloud) or per invocation-second
    /// (FaaS).
    pub cost: f64,
    pub memory: f64,
    /// Largest cluster size for edge/cloud resources; always 1 for FaaS.
    pub max_instances: u32,
    pub n_cores: Option<f64>,
    pub description: Option<String>,
    /// FaaS only: how long a warm instance lingers before teardown.
    pub idle_time_before_kill: Option<f64>,
    /// FaaS only: cost of a cold-start transition.
    pub transition_cost: Option<f64>,
}

impl Resource {
    pub fn is_faas(&self) -> bool {
        self.kind == ResourceKind::Faas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_predicates() {
        let vm = Resource {
            name: "VM1".into(),
            kind: ResourceKind::Cloud,
            layer: 0,
            cost: 0.4,
            memory: 4096.0,
            max_instances: 6,
            n_cores: Some(2.0),
            description: None,
            idle_time_before_kill: None,
            transition_cost: None,
        };
        assert!(!vm.is_faas());
    }
}
