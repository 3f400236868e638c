//! Move operators shared by all neighborhood searches, plus the
//! cluster-size reduction applied after every move.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::model::System;
use crate::placement::{check_feasibility, Assignment, Placement};

/// What a move touched, for the tabu list: the destination cell of the
/// primary reassigned partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSignature {
    pub component: usize,
    pub partition: usize,
    pub resource: usize,
}

/// Uniform random assignment for one partition: a compatible resource and,
/// on edge/cloud, a cluster size in `[1, max_instances]`.
pub fn random_assignment(
    sys: &System,
    i: usize,
    h: usize,
    rng: &mut ChaCha8Rng,
) -> Option<Assignment> {
    let options = sys.compatible_resources(i, h);
    let &resource = options.choose(rng)?;
    Some(Assignment {
        resource,
        count: random_count(sys, resource, rng),
    })
}

fn random_count(sys: &System, j: usize, rng: &mut ChaCha8Rng) -> u32 {
    let r = sys.resource(j);
    if r.is_faas() || r.max_instances <= 1 {
        1
    } else {
        rng.gen_range(1..=r.max_instances)
    }
}

/// Replace component `i`'s assignment with deployment `dep`, drawing a
/// random compatible resource for each partition. Fails only when some
/// partition has no compatible resource at all.
pub fn assign_deployment(
    sys: &System,
    placement: &mut Placement,
    i: usize,
    dep: usize,
    rng: &mut ChaCha8Rng,
) -> bool {
    placement.clear_component(i);
    for &h in &sys.component(i).deployments[dep].partitions {
        match random_assignment(sys, i, h, rng) {
            Some(a) => placement.set(i, h, Some(a)),
            None => return false,
        }
    }
    true
}

/// Draw one neighbor of `placement`. Move kinds are weighted so that
/// deployment swaps stay rare; cluster-size reduction runs on the result.
pub fn propose_neighbor(
    sys: &System,
    placement: &Placement,
    rng: &mut ChaCha8Rng,
) -> Option<(Placement, MoveSignature)> {
    for _ in 0..8 {
        let proposal = match rng.gen_range(0..10u32) {
            0..=3 => reassign(sys, placement, rng),
            4..=6 => resize(sys, placement, rng),
            7..=8 => redeploy(sys, placement, rng),
            _ => swap_deployments(sys, placement, rng),
        };
        if let Some((mut neighbor, signature)) = proposal {
            reduce_all_clusters(sys, &mut neighbor);
            return Some((neighbor, signature));
        }
    }
    None
}

/// Mutation used by the genetic algorithm: one move restricted to the
/// given component.
pub fn mutate_component(sys: &System, placement: &mut Placement, i: usize, rng: &mut ChaCha8Rng) {
    let assigned: Vec<(usize, Assignment)> = placement.assigned(i).collect();
    if assigned.is_empty() {
        return;
    }
    match rng.gen_range(0..3u32) {
        0 => {
            let &(h, current) = assigned.choose(rng).expect("component has assignments");
            if let Some(a) = reassignment_target(sys, i, h, current.resource, rng) {
                placement.set(i, h, Some(a));
            }
        }
        1 => {
            let resizable: Vec<(usize, Assignment)> = assigned
                .iter()
                .copied()
                .filter(|(_, a)| {
                    a.resource < sys.faas_start() && sys.resource(a.resource).max_instances > 1
                })
                .collect();
            if let Some(&(h, a)) = resizable.choose(rng) {
                let count = random_count(sys, a.resource, rng);
                placement.set(
                    i,
                    h,
                    Some(Assignment {
                        resource: a.resource,
                        count,
                    }),
                );
            }
        }
        _ => {
            let deployments = sys.component(i).deployments.len();
            if deployments > 1 {
                let current = sys.component(i).deployment_of(assigned[0].0);
                let target = rng.gen_range(0..deployments);
                if Some(target) != current {
                    assign_deployment(sys, placement, i, target, rng);
                }
            }
        }
    }
}

fn reassignment_target(
    sys: &System,
    i: usize,
    h: usize,
    current: usize,
    rng: &mut ChaCha8Rng,
) -> Option<Assignment> {
    let alternatives: Vec<usize> = sys
        .compatible_resources(i, h)
        .iter()
        .copied()
        .filter(|&j| j != current)
        .collect();
    let &resource = alternatives.choose(rng)?;
    Some(Assignment {
        resource,
        count: random_count(sys, resource, rng),
    })
}

fn reassign(
    sys: &System,
    placement: &Placement,
    rng: &mut ChaCha8Rng,
) -> Option<(Placement, MoveSignature)> {
    let cells: Vec<(usize, usize, Assignment)> = placement.cells().collect();
    let &(i, h, current) = cells.choose(rng)?;
    let a = reassignment_target(sys, i, h, current.resource, rng)?;
    let mut neighbor = placement.clone();
    neighbor.set(i, h, Some(a));
    Some((
        neighbor,
        MoveSignature {
            component: i,
            partition: h,
            resource: a.resource,
        },
    ))
}

fn resize(
    sys: &System,
    placement: &Placement,
    rng: &mut ChaCha8Rng,
) -> Option<(Placement, MoveSignature)> {
    let cells: Vec<(usize, usize, Assignment)> = placement
        .cells()
        .filter(|(_, _, a)| {
            a.resource < sys.faas_start() && sys.resource(a.resource).max_instances > 1
        })
        .collect();
    let &(i, h, a) = cells.choose(rng)?;
    let max = sys.resource(a.resource).max_instances;
    let count = rng.gen_range(1..=max);
    if count == a.count {
        return None;
    }
    let mut neighbor = placement.clone();
    neighbor.set(
        i,
        h,
        Some(Assignment {
            resource: a.resource,
            count,
        }),
    );
    Some((
        neighbor,
        MoveSignature {
            component: i,
            partition: h,
            resource: a.resource,
        },
    ))
}

fn redeploy(
    sys: &System,
    placement: &Placement,
    rng: &mut ChaCha8Rng,
) -> Option<(Placement, MoveSignature)> {
    let candidates: Vec<usize> = (0..sys.n_components())
        .filter(|&i| sys.component(i).deployments.len() > 1)
        .collect();
    let &i = candidates.choose(rng)?;
    let current = placement
        .assigned(i)
        .next()
        .and_then(|(h, _)| sys.component(i).deployment_of(h));
    let target = rng.gen_range(0..sys.component(i).deployments.len());
    if Some(target) == current {
        return None;
    }
    let mut neighbor = placement.clone();
    if !assign_deployment(sys, &mut neighbor, i, target, rng) {
        return None;
    }
    let (first_h, first_a) = neighbor.assigned(i).next()?;
    Some((
        neighbor,
        MoveSignature {
            component: i,
            partition: first_h,
            resource: first_a.resource,
        },
    ))
}

/// Exchange the resource classes of two components. Only applies when the
/// two run the same number of partitions and every crossed cell stays
/// compatible; otherwise the draw is discarded.
fn swap_deployments(
    sys: &System,
    placement: &Placement,
    rng: &mut ChaCha8Rng,
) -> Option<(Placement, MoveSignature)> {
    if sys.n_components() < 2 {
        return None;
    }
    let a = rng.gen_range(0..sys.n_components());
    let b = rng.gen_range(0..sys.n_components());
    if a == b {
        return None;
    }
    let cells_a: Vec<(usize, Assignment)> = placement.assigned(a).collect();
    let cells_b: Vec<(usize, Assignment)> = placement.assigned(b).collect();
    if cells_a.len() != cells_b.len() || cells_a.is_empty() {
        return None;
    }

    let mut neighbor = placement.clone();
    for (&(ha, ass_a), &(hb, ass_b)) in cells_a.iter().zip(&cells_b) {
        if !sys.compatible(a, ha, ass_b.resource) || !sys.compatible(b, hb, ass_a.resource) {
            return None;
        }
        neighbor.set(a, ha, Some(clamped(sys, ass_b.resource, ass_a.count)));
        neighbor.set(b, hb, Some(clamped(sys, ass_a.resource, ass_b.count)));
    }
    let (first_h, first_a) = neighbor.assigned(a).next()?;
    Some((
        neighbor,
        MoveSignature {
            component: a,
            partition: first_h,
            resource: first_a.resource,
        },
    ))
}

fn clamped(sys: &System, resource: usize, count: u32) -> Assignment {
    let r = sys.resource(resource);
    let count = if r.is_faas() {
        1
    } else {
        count.clamp(1, r.max_instances)
    };
    Assignment { resource, count }
}

/// Shrink the cluster on resource `j` while the placement stays feasible:
/// every cell with more than one instance loses one per round, so the
/// partition-to-resource mapping never changes.
pub fn reduce_cluster_size(sys: &System, placement: &mut Placement, j: usize) {
    if j >= sys.faas_start() || sys.resource(j).max_instances <= 1 {
        return;
    }
    while placement.instance_peaks()[j] > 1 {
        let mut trial = placement.clone();
        for (i, h, a) in placement.cells() {
            if a.resource == j && a.count > 1 {
                trial.set(
                    i,
                    h,
                    Some(Assignment {
                        resource: j,
                        count: a.count - 1,
                    }),
                );
            }
        }
        if check_feasibility(sys, &trial).feasible {
            *placement = trial;
        } else {
            break;
        }
    }
}

/// Apply the reduction to every non-FaaS resource.
pub fn reduce_all_clusters(sys: &System, placement: &mut Placement) {
    for j in 0..sys.faas_start() {
        reduce_cluster_size(sys, placement, j);
    }
}
