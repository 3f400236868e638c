//! Network domains connecting computational layers.

/// A set of computational layers that can talk to each other directly,
/// characterized by an access delay and a shared bandwidth.
#[derive(Debug, Clone)]
pub struct NetworkDomain {
    pub name: String,
    pub access_delay: f64,
    /// Mbps.
    pub bandwidth: f64,
    /// Layer indices covered by this domain (including transitive
    /// subdomains, already flattened by the manifest generator).
    pub layers: Vec<usize>,
}

impl NetworkDomain {
    /// Time to move `data` MB across this domain. Data is converted from
    /// MB to Mb before dividing by the bandwidth.
    pub fn transfer_time(&self, data: f64) -> f64 {
        self.access_delay + data * 8.0 / self.bandwidth
    }

    pub fn covers(&self, layer: usize) -> bool {
        self.layers.contains(&layer)
    }
}
