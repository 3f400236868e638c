//! System description: loading, index assignment and lookups.
//!
//! Resources receive dense indices in a fixed order — edge first, then
//! cloud, then FaaS — and both the cost function and the edge→cloud
//! monotonicity rule depend on that ordering.

use std::collections::BTreeMap;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::perf::PerformanceModel;

use super::{
    natural_cmp, Component, Dag, Deployment, GlobalConstraint, Grid, LocalConstraint,
    NetworkDomain, Partition, Resource, ResourceKind,
};

// ---------------------------------------------------------------------------
// Raw JSON shapes (§6.1). BTreeMap keeps deserialization deterministic;
// the natural name order is applied afterwards.
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawSystem {
    #[serde(rename = "EdgeResources", default)]
    edge: BTreeMap<String, BTreeMap<String, RawNodeResource>>,
    #[serde(rename = "CloudResources", default)]
    cloud: BTreeMap<String, BTreeMap<String, RawNodeResource>>,
    #[serde(rename = "FaaSResources", default)]
    faas: BTreeMap<String, BTreeMap<String, RawFaasResource>>,
    #[serde(rename = "Components")]
    components: BTreeMap<String, BTreeMap<String, BTreeMap<String, RawPartition>>>,
    #[serde(rename = "CompatibilityMatrix")]
    compatibility: BTreeMap<String, BTreeMap<String, Vec<RawCompatibility>>>,
    #[serde(rename = "Performance")]
    performance: BTreeMap<String, BTreeMap<String, BTreeMap<String, RawModel>>>,
    #[serde(rename = "NetworkTechnology")]
    network: BTreeMap<String, RawDomain>,
    #[serde(rename = "LocalConstraints", default)]
    local_constraints: BTreeMap<String, RawLocalConstraint>,
    #[serde(rename = "GlobalConstraints", default)]
    global_constraints: BTreeMap<String, RawGlobalConstraint>,
    #[serde(rename = "DirectedAcyclicGraph")]
    dag: BTreeMap<String, RawDagNode>,
    #[serde(rename = "Lambda")]
    lambda: f64,
    #[serde(rename = "Time")]
    time: f64,
}

#[derive(Deserialize)]
struct RawNodeResource {
    number: u32,
    cost: f64,
    memory: f64,
    n_cores: Option<f64>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct RawFaasResource {
    cost: f64,
    memory: f64,
    idle_time_before_kill: f64,
    transition_cost: f64,
    description: Option<String>,
}

#[derive(Deserialize)]
struct RawPartition {
    early_exit_probability: f64,
    #[serde(default, deserialize_with = "scalar_or_first")]
    data_size: f64,
}

#[derive(Deserialize)]
struct RawCompatibility {
    resource: String,
    memory: f64,
}

#[derive(Deserialize)]
struct RawModel {
    model: String,
    demand: Option<f64>,
    #[serde(rename = "demandWarm")]
    demand_warm: Option<f64>,
    #[serde(rename = "demandCold")]
    demand_cold: Option<f64>,
    regressor_file: Option<String>,
}

#[derive(Deserialize)]
struct RawDomain {
    #[serde(rename = "computationalLayers")]
    layers: Vec<String>,
    #[serde(rename = "AccessDelay")]
    access_delay: f64,
    #[serde(rename = "Bandwidth")]
    bandwidth: f64,
}

#[derive(Deserialize)]
struct RawLocalConstraint {
    local_res_time: f64,
}

#[derive(Deserialize)]
struct RawGlobalConstraint {
    components: Vec<String>,
    global_res_time: f64,
}

#[derive(Deserialize)]
struct RawDagNode {
    #[serde(default)]
    next: Vec<String>,
    #[serde(default)]
    transition_probability: Vec<f64>,
}

/// Accept both `"data_size": 4.2` and `"data_size": [4.2]`.
fn scalar_or_first<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;
    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("data_size is not a number")),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|v| v.as_f64())
            .ok_or_else(|| D::Error::custom("data_size list is empty")),
        _ => Err(D::Error::custom("data_size must be a number or a list")),
    }
}

// ---------------------------------------------------------------------------
// Indexed system
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct System {
    components: Vec<Component>,
    resources: Vec<Resource>,
    layers: Vec<String>,
    cloud_start: usize,
    faas_start: usize,
    domains: Vec<NetworkDomain>,
    /// Per component: boolean compatibility mask `[partition × resource]`.
    compat: Vec<Grid<bool>>,
    /// Per component: memory needed by partition h on resource j.
    memory_req: Vec<Grid<f64>>,
    /// Per component: nominal service time of partition h on resource j.
    demand: Vec<Grid<f64>>,
    models: Vec<Grid<Option<PerformanceModel>>>,
    /// Per component and partition: compatible resource indices.
    compat_lists: Vec<Vec<Vec<usize>>>,
    local_constraints: Vec<LocalConstraint>,
    global_constraints: Vec<GlobalConstraint>,
    dag: Dag,
    lambda: f64,
    time_horizon: f64,
    component_index: FxHashMap<String, usize>,
    /// Common network domains for every layer pair that shares at least one.
    domain_pairs: FxHashMap<(usize, usize), Vec<usize>>,
}

impl System {
    /// Load and index a system description from a JSON file. I/O problems
    /// are fatal and carry the offending path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::MissingInput(format!("{}: {e}", path.display())))?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        Self::from_json(&value)
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let raw: RawSystem = serde_json::from_value(value.clone())?;
        if raw.lambda <= 0.0 {
            return Err(Error::Validation("Lambda must be positive".into()));
        }
        if raw.time <= 0.0 {
            return Err(Error::Validation("Time must be positive".into()));
        }

        let (components, component_index) = build_components(&raw)?;
        let (resources, layers, cloud_start, faas_start) = build_resources(&raw)?;
        let resource_index: FxHashMap<String, usize> = resources
            .iter()
            .enumerate()
            .map(|(j, r)| (r.name.clone(), j))
            .collect();
        let domains = build_domains(&raw, &layers)?;
        let domain_pairs = build_domain_pairs(&domains, layers.len());
        let dag = build_dag(&raw, &component_index)?;

        let mut system = Self {
            compat: Vec::new(),
            memory_req: Vec::new(),
            demand: Vec::new(),
            models: Vec::new(),
            compat_lists: Vec::new(),
            local_constraints: Vec::new(),
            global_constraints: Vec::new(),
            components,
            resources,
            layers,
            cloud_start,
            faas_start,
            domains,
            dag,
            lambda: raw.lambda,
            time_horizon: raw.time,
            component_index,
            domain_pairs,
        };
        system.build_matrices(&raw, &resource_index)?;
        system.build_constraints(&raw)?;
        system.recompute_rates(raw.lambda);
        debug!(
            components = system.components.len(),
            resources = system.resources.len(),
            cloud_start = system.cloud_start,
            faas_start = system.faas_start,
            "system loaded"
        );
        Ok(system)
    }

    fn build_matrices(
        &mut self,
        raw: &RawSystem,
        resource_index: &FxHashMap<String, usize>,
    ) -> Result<()> {
        let j_count = self.resources.len();
        for component in &self.components {
            let h_count = component.partitions.len();
            let mut compat = Grid::filled(h_count, j_count, false);
            let mut memory = Grid::filled(h_count, j_count, 0.0);
            let mut demand = Grid::filled(h_count, j_count, f64::NAN);
            let mut models: Grid<Option<PerformanceModel>> =
                Grid::filled(h_count, j_count, None);

            let compat_rows = raw.compatibility.get(&component.name).ok_or_else(|| {
                Error::Validation(format!(
                    "component {} missing from CompatibilityMatrix",
                    component.name
                ))
            })?;
            let perf_rows = raw.performance.get(&component.name).ok_or_else(|| {
                Error::Validation(format!(
                    "component {} missing from Performance",
                    component.name
                ))
            })?;

            for (h, partition) in component.partitions.iter().enumerate() {
                let candidates = compat_rows.get(&partition.name).ok_or_else(|| {
                    Error::Validation(format!(
                        "partition {}/{} missing from CompatibilityMatrix",
                        component.name, partition.name
                    ))
                })?;
                if candidates.is_empty() {
                    return Err(Error::Validation(format!(
                        "partition {}/{} has no compatible resource",
                        component.name, partition.name
                    )));
                }
                for cell in candidates {
                    let &j = resource_index
                        .get(&cell.resource)
                        .ok_or_else(|| Error::UnknownResource(cell.resource.clone()))?;
                    compat.set(h, j, true);
                    memory.set(h, j, cell.memory);

                    let raw_model = perf_rows
                        .get(&partition.name)
                        .and_then(|row| row.get(&cell.resource))
                        .ok_or_else(|| {
                            Error::Validation(format!(
                                "no performance model for {}/{} on {}",
                                component.name, partition.name, cell.resource
                            ))
                        })?;
                    let model = PerformanceModel::from_keyword(
                        &raw_model.model,
                        raw_model.demand_warm,
                        raw_model.demand_cold,
                        raw_model.regressor_file.as_deref(),
                    )?;
                    // The demand matrix always carries a nominal service
                    // time: it feeds utilization, FaaS response and cost.
                    let d = raw_model.demand.or(raw_model.demand_warm).ok_or_else(|| {
                        Error::Validation(format!(
                            "no demand for {}/{} on {}",
                            component.name, partition.name, cell.resource
                        ))
                    })?;
                    if d < 0.0 {
                        return Err(Error::Validation(format!(
                            "negative demand for {}/{} on {}",
                            component.name, partition.name, cell.resource
                        )));
                    }
                    demand.set(h, j, d);
                    models.set(h, j, Some(model));
                }
            }

            let lists: Vec<Vec<usize>> = (0..h_count)
                .map(|h| (0..j_count).filter(|&j| *compat.get(h, j)).collect())
                .collect();
            self.compat.push(compat);
            self.memory_req.push(memory);
            self.demand.push(demand);
            self.models.push(models);
            self.compat_lists.push(lists);
        }
        Ok(())
    }

    fn build_constraints(&mut self, raw: &RawSystem) -> Result<()> {
        for (name, lc) in &raw.local_constraints {
            let &component = self
                .component_index
                .get(name)
                .ok_or_else(|| Error::UnknownComponent(name.clone()))?;
            if lc.local_res_time <= 0.0 {
                return Err(Error::Validation(format!(
                    "local constraint on {name} must have a positive bound"
                )));
            }
            self.local_constraints.push(LocalConstraint {
                component,
                max_response_time: lc.local_res_time,
            });
        }
        self.local_constraints.sort_by_key(|lc| lc.component);

        for (path_name, gc) in &raw.global_constraints {
            let mut members = Vec::with_capacity(gc.components.len());
            for name in &gc.components {
                let &i = self
                    .component_index
                    .get(name)
                    .ok_or_else(|| Error::UnknownComponent(name.clone()))?;
                members.push(i);
            }
            for pair in members.windows(2) {
                let connected = self
                    .dag
                    .successors(pair[0])
                    .iter()
                    .any(|&(succ, _)| succ == pair[1]);
                if !connected {
                    return Err(Error::Validation(format!(
                        "global constraint {path_name} is not a walk of the DAG"
                    )));
                }
            }
            if gc.global_res_time <= 0.0 {
                return Err(Error::Validation(format!(
                    "global constraint {path_name} must have a positive bound"
                )));
            }
            self.global_constraints.push(GlobalConstraint {
                path_name: path_name.clone(),
                components: members,
                max_response_time: gc.global_res_time,
            });
        }
        Ok(())
    }

    fn recompute_rates(&mut self, lambda: f64) {
        self.lambda = lambda;
        let comp_rates = self.dag.propagate_rates(lambda);
        for (i, component) in self.components.iter_mut().enumerate() {
            component.comp_lambda = comp_rates[i];
            component.rechain_partition_rates();
        }
    }

    /// Copy of this system with all arrival rates rebuilt for a different
    /// application rate. Propagation is linear in the rate, so scaling is
    /// exact.
    pub fn scaled_to(&self, lambda: f64) -> System {
        let mut scaled = self.clone();
        scaled.recompute_rates(lambda);
        scaled
    }

    // -- lookups -----------------------------------------------------------

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, i: usize) -> &Component {
        &self.components[i]
    }

    pub fn component_named(&self, name: &str) -> Option<usize> {
        self.component_index.get(name).copied()
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource(&self, j: usize) -> &Resource {
        &self.resources[j]
    }

    pub fn n_components(&self) -> usize {
        self.components.len()
    }

    pub fn n_resources(&self) -> usize {
        self.resources.len()
    }

    /// First cloud resource index; everything below is edge.
    pub fn cloud_start(&self) -> usize {
        self.cloud_start
    }

    /// First FaaS resource index; everything below is edge or cloud.
    pub fn faas_start(&self) -> usize {
        self.faas_start
    }

    pub fn layer_name(&self, layer: usize) -> &str {
        &self.layers[layer]
    }

    pub fn compatible(&self, i: usize, h: usize, j: usize) -> bool {
        *self.compat[i].get(h, j)
    }

    pub fn compatible_resources(&self, i: usize, h: usize) -> &[usize] {
        &self.compat_lists[i][h]
    }

    pub fn demand(&self, i: usize, h: usize, j: usize) -> f64 {
        *self.demand[i].get(h, j)
    }

    pub fn memory_req(&self, i: usize, h: usize, j: usize) -> f64 {
        *self.memory_req[i].get(h, j)
    }

    pub fn model(&self, i: usize, h: usize, j: usize) -> Option<&PerformanceModel> {
        self.models[i].get(h, j).as_ref()
    }

    pub fn part_lambda(&self, i: usize, h: usize) -> f64 {
        self.components[i].partitions[h].part_lambda
    }

    pub fn comp_lambda(&self, i: usize) -> f64 {
        self.components[i].comp_lambda
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn time_horizon(&self) -> f64 {
        self.time_horizon
    }

    pub fn local_constraints(&self) -> &[LocalConstraint] {
        &self.local_constraints
    }

    pub fn local_constraint_of(&self, i: usize) -> Option<&LocalConstraint> {
        self.local_constraints.iter().find(|lc| lc.component == i)
    }

    pub fn global_constraints(&self) -> &[GlobalConstraint] {
        &self.global_constraints
    }

    pub fn dag(&self) -> &Dag {
        &self.dag
    }

    pub fn domains(&self) -> &[NetworkDomain] {
        &self.domains
    }

    /// Transfer time for `data` MB between the layers of two resources:
    /// the minimum over their common network domains, `+∞` when the
    /// layers share none (the pair simply cannot communicate).
    pub fn network_delay(&self, j1: usize, j2: usize, data: f64) -> f64 {
        if j1 == j2 {
            return 0.0;
        }
        let l1 = self.resources[j1].layer;
        let l2 = self.resources[j2].layer;
        if l1 == l2 {
            // Same layer still crosses the domain fabric when the devices
            // differ.
            return self
                .domain_pairs
                .get(&(l1, l2))
                .map(|ds| best_delay(&self.domains, ds, data))
                .unwrap_or(f64::INFINITY);
        }
        let key = if l1 < l2 { (l1, l2) } else { (l2, l1) };
        self.domain_pairs
            .get(&key)
            .map(|ds| best_delay(&self.domains, ds, data))
            .unwrap_or(f64::INFINITY)
    }
}

fn best_delay(domains: &[NetworkDomain], candidates: &[usize], data: f64) -> f64 {
    candidates
        .iter()
        .map(|&d| domains[d].transfer_time(data))
        .fold(f64::INFINITY, f64::min)
}

fn build_components(
    raw: &RawSystem,
) -> Result<(Vec<Component>, FxHashMap<String, usize>)> {
    let mut names: Vec<&String> = raw.components.keys().collect();
    names.sort_by(|a, b| natural_cmp(a, b));

    let mut components = Vec::with_capacity(names.len());
    let mut index = FxHashMap::default();
    for name in names {
        let deployments_raw = &raw.components[name];

        // Partition names across all deployments, each owned by exactly one.
        let mut partition_names: Vec<(String, String)> = Vec::new();
        for (dep_name, partitions) in deployments_raw {
            for part_name in partitions.keys() {
                if partition_names.iter().any(|(p, _)| p == part_name) {
                    return Err(Error::Validation(format!(
                        "partition {part_name} of {name} appears in more than one deployment"
                    )));
                }
                partition_names.push((part_name.clone(), dep_name.clone()));
            }
        }
        partition_names.sort_by(|a, b| natural_cmp(&a.0, &b.0));
        if partition_names.is_empty() {
            return Err(Error::Validation(format!("component {name} has no partitions")));
        }

        let mut partitions = Vec::with_capacity(partition_names.len());
        for (part_name, dep_name) in &partition_names {
            let p = &deployments_raw[dep_name][part_name];
            if !(0.0..1.0).contains(&p.early_exit_probability) {
                return Err(Error::Validation(format!(
                    "early exit probability of {name}/{part_name} must be in [0, 1)"
                )));
            }
            if part_name == "base" && p.early_exit_probability != 0.0 {
                return Err(Error::Validation(format!(
                    "base partition of {name} cannot early-exit"
                )));
            }
            partitions.push(Partition {
                name: part_name.clone(),
                data_size: p.data_size,
                early_exit_probability: p.early_exit_probability,
                part_lambda: 0.0,
            });
        }

        let mut dep_names: Vec<&String> = deployments_raw.keys().collect();
        dep_names.sort_by(|a, b| natural_cmp(a, b));
        let deployments = dep_names
            .into_iter()
            .map(|dep_name| {
                let mut members: Vec<usize> = partition_names
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, d))| d == dep_name)
                    .map(|(h, _)| h)
                    .collect();
                members.sort_unstable();
                if members.is_empty() {
                    return Err(Error::Validation(format!(
                        "deployment {dep_name} of {name} has no partitions"
                    )));
                }
                Ok(Deployment {
                    name: dep_name.clone(),
                    partitions: members,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        index.insert(name.clone(), components.len());
        components.push(Component {
            name: name.clone(),
            partitions,
            deployments,
            comp_lambda: 0.0,
        });
    }
    Ok((components, index))
}

fn build_resources(raw: &RawSystem) -> Result<(Vec<Resource>, Vec<String>, usize, usize)> {
    let mut resources = Vec::new();
    let mut layers: Vec<String> = Vec::new();

    let mut push_layer = |layers: &mut Vec<String>, name: &str| -> usize {
        if let Some(idx) = layers.iter().position(|l| l == name) {
            idx
        } else {
            layers.push(name.to_string());
            layers.len() - 1
        }
    };

    for (group, kind) in [(&raw.edge, ResourceKind::Edge), (&raw.cloud, ResourceKind::Cloud)] {
        let mut entries: Vec<(&String, &String, &RawNodeResource)> = group
            .iter()
            .flat_map(|(layer, rs)| rs.iter().map(move |(name, r)| (layer, name, r)))
            .collect();
        entries.sort_by(|a, b| natural_cmp(a.0, b.0).then_with(|| natural_cmp(a.1, b.1)));
        for (layer, name, r) in entries {
            validate_resource(name, r.cost, r.memory)?;
            if r.number == 0 {
                return Err(Error::Validation(format!(
                    "resource {name} must provide at least one instance"
                )));
            }
            let layer = push_layer(&mut layers, layer);
            resources.push(Resource {
                name: name.clone(),
                kind,
                layer,
                cost: r.cost,
                memory: r.memory,
                max_instances: r.number,
                n_cores: r.n_cores,
                description: r.description.clone(),
                idle_time_before_kill: None,
                transition_cost: None,
            });
        }
    }
    let cloud_start = resources
        .iter()
        .position(|r| r.kind == ResourceKind::Cloud)
        .unwrap_or(resources.len());

    let mut faas_entries: Vec<(&String, &String, &RawFaasResource)> = raw
        .faas
        .iter()
        .flat_map(|(layer, rs)| rs.iter().map(move |(name, r)| (layer, name, r)))
        .collect();
    faas_entries.sort_by(|a, b| natural_cmp(a.0, b.0).then_with(|| natural_cmp(a.1, b.1)));
    let faas_start = resources.len();
    for (layer, name, r) in faas_entries {
        validate_resource(name, r.cost, r.memory)?;
        let layer = push_layer(&mut layers, layer);
        resources.push(Resource {
            name: name.clone(),
            kind: ResourceKind::Faas,
            layer,
            cost: r.cost,
            memory: r.memory,
            max_instances: 1,
            n_cores: None,
            description: r.description.clone(),
            idle_time_before_kill: Some(r.idle_time_before_kill),
            transition_cost: Some(r.transition_cost),
        });
    }

    if resources.is_empty() {
        return Err(Error::Validation("no resources declared".into()));
    }
    let mut seen = FxHashMap::default();
    for (j, r) in resources.iter().enumerate() {
        if let Some(prev) = seen.insert(r.name.clone(), j) {
            return Err(Error::Validation(format!(
                "resource name {} is not unique (indices {prev} and {j})",
                r.name
            )));
        }
    }
    Ok((resources, layers, cloud_start, faas_start))
}

fn validate_resource(name: &str, cost: f64, memory: f64) -> Result<()> {
    if cost < 0.0 {
        return Err(Error::Validation(format!("resource {name} has a negative cost")));
    }
    if memory <= 0.0 {
        return Err(Error::Validation(format!("resource {name} has no memory")));
    }
    Ok(())
}

fn build_domains(raw: &RawSystem, layers: &[String]) -> Result<Vec<NetworkDomain>> {
    let mut domains = Vec::with_capacity(raw.network.len());
    for (name, d) in &raw.network {
        if d.bandwidth <= 0.0 {
            return Err(Error::Validation(format!(
                "network domain {name} must have positive bandwidth"
            )));
        }
        // Layers that host no resource are legal in the manifest; they
        // simply never participate in a transfer.
        let member_layers: Vec<usize> = d
            .layers
            .iter()
            .filter_map(|l| layers.iter().position(|known| known == l))
            .collect();
        domains.push(NetworkDomain {
            name: name.clone(),
            access_delay: d.access_delay,
            bandwidth: d.bandwidth,
            layers: member_layers,
        });
    }
    Ok(domains)
}

fn build_domain_pairs(
    domains: &[NetworkDomain],
    n_layers: usize,
) -> FxHashMap<(usize, usize), Vec<usize>> {
    let mut pairs: FxHashMap<(usize, usize), Vec<usize>> = FxHashMap::default();
    for la in 0..n_layers {
        for lb in la..n_layers {
            let common: Vec<usize> = domains
                .iter()
                .enumerate()
                .filter(|(_, d)| d.covers(la) && d.covers(lb))
                .map(|(idx, _)| idx)
                .collect();
            if !common.is_empty() {
                pairs.insert((la, lb), common);
            }
        }
    }
    pairs
}

fn build_dag(raw: &RawSystem, index: &FxHashMap<String, usize>) -> Result<Dag> {
    let mut edges = Vec::new();
    for (name, node) in &raw.dag {
        let &u = index
            .get(name)
            .ok_or_else(|| Error::UnknownComponent(name.clone()))?;
        for (k, succ) in node.next.iter().enumerate() {
            let &v = index
                .get(succ)
                .ok_or_else(|| Error::UnknownComponent(succ.clone()))?;
            let p = node.transition_probability.get(k).copied().unwrap_or(1.0);
            edges.push((u, v, p));
        }
    }
    Dag::new(index.len(), &edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_system() -> serde_json::Value {
        json!({
            "EdgeResources": {
                "computationallayer1": {
                    "Edge1": {"number": 2, "cost": 0.1, "memory": 2048.0, "n_cores": 1.0}
                }
            },
            "CloudResources": {
                "computationallayer2": {
                    "VM1": {"number": 4, "cost": 0.4, "memory": 8192.0, "n_cores": 2.0}
                }
            },
            "FaaSResources": {
                "computationallayer3": {
                    "F1": {"cost": 0.002, "memory": 1024.0,
                           "idle_time_before_kill": 600.0, "transition_cost": 0.3}
                }
            },
            "Components": {
                "c1": {
                    "s1": {"base": {"early_exit_probability": 0.0, "data_size": [2.0]}},
                    "s2": {
                        "h1": {"early_exit_probability": 0.2, "data_size": [1.0]},
                        "h2": {"early_exit_probability": 0.0, "data_size": [0.5]}
                    }
                }
            },
            "CompatibilityMatrix": {
                "c1": {
                    "base": [{"resource": "Edge1", "memory": 512.0},
                             {"resource": "VM1", "memory": 512.0}],
                    "h1": [{"resource": "Edge1", "memory": 256.0}],
                    "h2": [{"resource": "VM1", "memory": 256.0},
                           {"resource": "F1", "memory": 256.0}]
                }
            },
            "Performance": {
                "c1": {
                    "base": {
                        "Edge1": {"model": "QTedge", "demand": 0.05},
                        "VM1": {"model": "QTcloud", "demand": 0.02}
                    },
                    "h1": {"Edge1": {"model": "QTedge", "demand": 0.03}},
                    "h2": {
                        "VM1": {"model": "QTcloud", "demand": 0.01},
                        "F1": {"model": "FAAS", "demandWarm": 0.08, "demandCold": 0.4}
                    }
                }
            },
            "NetworkTechnology": {
                "ND1": {
                    "computationalLayers": ["computationallayer1", "computationallayer2",
                                            "computationallayer3"],
                    "AccessDelay": 0.01, "Bandwidth": 100.0
                }
            },
            "LocalConstraints": {"c1": {"local_res_time": 2.0}},
            "GlobalConstraints": {},
            "DirectedAcyclicGraph": {"c1": {"next": []}},
            "Lambda": 5.0,
            "Time": 1.0
        })
    }

    #[test]
    fn resources_are_indexed_edge_cloud_faas() {
        let sys = System::from_json(&minimal_system()).unwrap();
        assert_eq!(sys.n_resources(), 3);
        assert_eq!(sys.cloud_start(), 1);
        assert_eq!(sys.faas_start(), 2);
        assert_eq!(sys.resource(0).name, "Edge1");
        assert_eq!(sys.resource(1).name, "VM1");
        assert!(sys.resource(2).is_faas());
        assert_eq!(sys.resource(2).max_instances, 1);
    }

    #[test]
    fn partition_rates_follow_early_exits() {
        let sys = System::from_json(&minimal_system()).unwrap();
        let c = sys.component(0);
        assert_eq!(c.comp_lambda, 5.0);
        // partitions sorted naturally: base, h1, h2
        assert_eq!(c.partitions[0].name, "base");
        assert_eq!(sys.part_lambda(0, 1), 5.0);
        assert!((sys.part_lambda(0, 2) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn scaling_rebuilds_rates_proportionally() {
        let sys = System::from_json(&minimal_system()).unwrap();
        let scaled = sys.scaled_to(10.0);
        assert_eq!(scaled.lambda(), 10.0);
        assert!((scaled.part_lambda(0, 2) - 8.0).abs() < 1e-12);
        // the original is untouched
        assert_eq!(sys.lambda(), 5.0);
    }

    #[test]
    fn network_delay_picks_minimum_common_domain() {
        let mut doc = minimal_system();
        doc["NetworkTechnology"]["ND2"] = json!({
            "computationalLayers": ["computationallayer1", "computationallayer2"],
            "AccessDelay": 0.001, "Bandwidth": 1000.0
        });
        let sys = System::from_json(&doc).unwrap();
        let fast = 0.001 + 2.0 * 8.0 / 1000.0;
        assert!((sys.network_delay(0, 1, 2.0) - fast).abs() < 1e-12);
        assert_eq!(sys.network_delay(1, 1, 2.0), 0.0);
    }

    #[test]
    fn rejects_unknown_resource_in_compatibility() {
        let mut doc = minimal_system();
        doc["CompatibilityMatrix"]["c1"]["base"] = json!([{"resource": "Ghost", "memory": 1.0}]);
        assert!(matches!(
            System::from_json(&doc),
            Err(Error::UnknownResource(_))
        ));
    }

    #[test]
    fn rejects_nonpositive_lambda() {
        let mut doc = minimal_system();
        doc["Lambda"] = json!(0.0);
        assert!(System::from_json(&doc).is_err());
    }
}
