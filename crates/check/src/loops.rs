//! Dependency-cycle detection and loop-resolution matching.
//!
//! Cycles are legal in the raw dependency graph; each one must be
//! answered by a `LoopResolution` record. Detection is a three-color
//! depth-first traversal over the dependent-to-supporting adjacency;
//! every back edge yields one cycle, reported in canonical rotation
//! (lexicographically smallest member first) so the same cycle is
//! never listed twice.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use prax_core::{ModelRegistry, SystemId};

/// One detected dependency cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleInfo {
    /// Members in traversal order, rotated so the smallest id is first.
    pub systems: Vec<String>,
    /// The loop-resolution record whose member set equals this cycle's,
    /// when one exists.
    pub resolved_by: Option<String>,
}

/// Outcome of the `loops` pass.
#[derive(Debug, Clone, Serialize)]
pub struct LoopsResult {
    pub cycles: Vec<CycleInfo>,
}

pub fn check_dependency_loops(registry: &ModelRegistry) -> LoopsResult {
    let adjacency = registry.dependency_adjacency();

    let mut visited: BTreeSet<&SystemId> = BTreeSet::new();
    let mut in_path: BTreeSet<&SystemId> = BTreeSet::new();
    let mut path: Vec<&SystemId> = Vec::new();
    let mut raw_cycles: Vec<Vec<String>> = Vec::new();

    for node in adjacency.keys().copied() {
        if !visited.contains(node) {
            cycle_dfs(
                node,
                &adjacency,
                &mut visited,
                &mut in_path,
                &mut path,
                &mut raw_cycles,
            );
        }
    }

    let mut seen: BTreeSet<Vec<String>> = BTreeSet::new();
    let mut cycles = Vec::new();
    for cycle in raw_cycles {
        let canonical = rotate_to_smallest(cycle);
        if seen.insert(canonical.clone()) {
            let resolved_by = find_resolution(registry, &canonical);
            cycles.push(CycleInfo {
                systems: canonical,
                resolved_by,
            });
        }
    }

    LoopsResult { cycles }
}

fn cycle_dfs<'a>(
    node: &'a SystemId,
    adjacency: &BTreeMap<&'a SystemId, Vec<&'a SystemId>>,
    visited: &mut BTreeSet<&'a SystemId>,
    in_path: &mut BTreeSet<&'a SystemId>,
    path: &mut Vec<&'a SystemId>,
    cycles: &mut Vec<Vec<String>>,
) {
    visited.insert(node);
    in_path.insert(node);
    path.push(node);

    if let Some(neighbors) = adjacency.get(node) {
        for &next in neighbors {
            if in_path.contains(next) {
                // back edge: the cycle is the path suffix from `next`
                if let Some(pos) = path.iter().position(|member| *member == next) {
                    cycles.push(path[pos..].iter().map(|member| member.to_string()).collect());
                }
            } else if !visited.contains(next) {
                cycle_dfs(next, adjacency, visited, in_path, path, cycles);
            }
        }
    }

    path.pop();
    in_path.remove(node);
}

/// Rotate a cycle so its lexicographically smallest member comes
/// first. Rotations of the same cycle all map to the same form.
fn rotate_to_smallest(mut cycle: Vec<String>) -> Vec<String> {
    if cycle.is_empty() {
        return cycle;
    }
    let min_pos = cycle
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(pos, _)| pos)
        .unwrap_or(0);
    cycle.rotate_left(min_pos);
    cycle
}

/// A resolution matches a cycle when its member set equals the cycle's
/// member set; order is irrelevant on both sides.
fn find_resolution(registry: &ModelRegistry, cycle: &[String]) -> Option<String> {
    let cycle_set: BTreeSet<&str> = cycle.iter().map(String::as_str).collect();
    registry
        .loop_resolutions()
        .find(|resolution| {
            let members: BTreeSet<&str> = resolution
                .systems
                .iter()
                .map(|system| system.as_str())
                .collect();
            members == cycle_set
        })
        .map(|resolution| resolution.id.to_string())
}
