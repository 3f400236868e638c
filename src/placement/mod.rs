//! Candidate placements, their feasibility and their cost.

mod config;
pub mod cost;
pub mod feasibility;
mod result;

pub use config::{Assignment, Placement};
pub use cost::placement_cost;
pub use feasibility::{check_feasibility, ConstraintOutcome, FeasibilityReport, Infeasibility};
pub use result::{Candidate, EliteSet};
