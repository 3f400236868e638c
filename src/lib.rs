//! EdgePlan - design-time placement optimization for DAG applications
//!
//! Given a component DAG, a catalog of edge nodes, cloud virtual machines
//! and serverless functions, and per-partition performance models, EdgePlan
//! searches for the cheapest assignment of component partitions to resources
//! that satisfies memory, utilization, topology and response-time
//! constraints, then binary-searches the largest sustainable workload rate.

pub mod app_config;
pub mod error;
pub mod model;
pub mod perf;
pub mod placement;
pub mod report;
pub mod search;
pub mod settings;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::System;
pub use placement::{Candidate, EliteSet, Placement};
