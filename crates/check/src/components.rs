//! Shared-component scan.
//!
//! The same component id modeled under several systems is a real
//! pattern (a bus feeding two trains, a header shared by two loops),
//! but it needs a sharing rationale: every occurrence must carry the
//! same group tag, or the sharing is flagged as unjustified.

use std::collections::BTreeMap;

use serde::Serialize;

use prax_core::ModelRegistry;

/// One component id that appears under two or more systems.
#[derive(Debug, Clone, Serialize)]
pub struct SharedComponent {
    pub component: String,
    /// Systems modeling the component, in id order.
    pub systems: Vec<String>,
    /// Group tag of each occurrence, aligned with `systems`.
    pub groups: Vec<Option<String>>,
    /// True when every occurrence carries the same non-empty tag.
    pub justified: bool,
}

/// Outcome of the `components` pass.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentsResult {
    pub shared: Vec<SharedComponent>,
}

pub fn check_shared_components(registry: &ModelRegistry) -> ComponentsResult {
    let mut occurrences: BTreeMap<&str, Vec<(&str, Option<&String>)>> = BTreeMap::new();
    for system in registry.systems() {
        for (component, entry) in &system.modeled_components {
            occurrences
                .entry(component.as_str())
                .or_default()
                .push((system.id.as_str(), entry.group.as_ref()));
        }
    }

    let shared = occurrences
        .into_iter()
        .filter(|(_, systems)| systems.len() > 1)
        .map(|(component, systems)| {
            let justified = match systems[0].1 {
                Some(first) => systems.iter().all(|(_, group)| *group == Some(first)),
                None => false,
            };
            SharedComponent {
                component: component.to_string(),
                groups: systems.iter().map(|(_, group)| group.cloned()).collect(),
                systems: systems.into_iter().map(|(id, _)| id.to_string()).collect(),
                justified,
            }
        })
        .collect();

    ComponentsResult { shared }
}
