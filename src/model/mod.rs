//! Immutable system catalog
//!
//! Everything the search reads — components, partitions, deployments,
//! resources, network domains, compatibility, demands, performance models
//! and constraints — is loaded once from a single JSON description and
//! shared read-only by all workers.

mod component;
mod constraint;
mod dag;
mod grid;
mod network;
mod resource;
mod system;

pub use component::{Component, Deployment, Partition};
pub use constraint::{GlobalConstraint, LocalConstraint};
pub use dag::Dag;
pub use grid::Grid;
pub use network::NetworkDomain;
pub use resource::{Resource, ResourceKind};
pub use system::System;

use std::cmp::Ordering;

/// Compare two names treating embedded digit runs numerically, so that
/// `c2` sorts before `c10`. Used everywhere dense indices are assigned.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ia = a.chars().peekable();
    let mut ib = b.chars().peekable();
    loop {
        match (ia.peek().copied(), ib.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let na = take_number(&mut ia);
                    let nb = take_number(&mut ib);
                    match na.cmp(&nb) {
                        Ordering::Equal => {}
                        other => return other,
                    }
                } else {
                    match ca.cmp(&cb) {
                        Ordering::Equal => {
                            ia.next();
                            ib.next();
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u64 {
    let mut value = 0u64;
    while let Some(c) = chars.peek().copied() {
        if let Some(d) = c.to_digit(10) {
            value = value.saturating_mul(10).saturating_add(d as u64);
            chars.next();
        } else {
            break;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_handles_digit_runs() {
        let mut names = vec!["c10", "c2", "c1", "h1", "base"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["base", "c1", "c2", "c10", "h1"]);
    }

    #[test]
    fn natural_order_falls_back_to_chars() {
        assert_eq!(natural_cmp("edge", "cloud"), Ordering::Greater);
        assert_eq!(natural_cmp("s1", "s1"), Ordering::Equal);
    }
}
