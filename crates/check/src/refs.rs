//! Reference resolution: every cross-record identifier must name a
//! registered record.
//!
//! Walks each record kind's outbound references plus the documentation
//! fragment keys. Success criteria held `ByReference` are deliberately
//! not walked: those ids belong to the success-criteria PRA element,
//! outside this model.

use serde::Serialize;

use prax_core::{EntityKind, FragmentKey, ModelRegistry, SystemId};

/// A reference whose target is not registered. `kind` and `id` name
/// the referrer; for documentation keys, `id` is the category key.
#[derive(Debug, Clone, Serialize)]
pub struct DanglingRef {
    pub kind: EntityKind,
    pub id: String,
    pub field: String,
    pub target_kind: EntityKind,
    pub target: String,
}

/// Outcome of the `refs` pass.
#[derive(Debug, Clone, Serialize)]
pub struct RefsResult {
    /// References that resolved.
    pub resolved: usize,
    pub dangling: Vec<DanglingRef>,
}

pub fn check_references(registry: &ModelRegistry) -> RefsResult {
    let mut result = RefsResult {
        resolved: 0,
        dangling: Vec::new(),
    };

    for dep in registry.dependencies() {
        for (field, target) in [
            ("dependentSystem", &dep.dependent_system),
            ("supportingSystem", &dep.supporting_system),
        ] {
            note_system(registry, &mut result, EntityKind::Dependency, dep.id.as_str(), field, target.as_str());
        }
        if let Some(action) = &dep.human_action {
            if registry.human_action(action).is_some() {
                result.resolved += 1;
            } else {
                result.dangling.push(DanglingRef {
                    kind: EntityKind::Dependency,
                    id: dep.id.to_string(),
                    field: "humanAction".into(),
                    target_kind: EntityKind::HumanAction,
                    target: action.to_string(),
                });
            }
        }
    }

    for resolution in registry.loop_resolutions() {
        for member in &resolution.systems {
            note_system(
                registry,
                &mut result,
                EntityKind::LoopResolution,
                resolution.id.as_str(),
                "systems",
                member.as_str(),
            );
        }
    }

    for tree in registry.fault_trees() {
        note_system(registry, &mut result, EntityKind::FaultTree, tree.id.as_str(), "system", tree.system.as_str());
    }

    for event in registry.basic_events() {
        note_system(registry, &mut result, EntityKind::BasicEvent, event.id.as_str(), "system", event.system.as_str());
    }

    for action in registry.human_actions() {
        if let Some(system) = &action.system {
            note_system(registry, &mut result, EntityKind::HumanAction, action.id.as_str(), "system", system.as_str());
        }
    }

    for treatment in registry.passive_treatments() {
        note_system(
            registry,
            &mut result,
            EntityKind::PassiveTreatment,
            treatment.id.as_str(),
            "system",
            treatment.system.as_str(),
        );
    }

    for evaluation in registry.evaluations() {
        note_system(
            registry,
            &mut result,
            EntityKind::Evaluation,
            evaluation.id.as_str(),
            "system",
            evaluation.system.as_str(),
        );
        if let Some(tree) = &evaluation.fault_tree {
            if registry.fault_tree(tree).is_some() {
                result.resolved += 1;
            } else {
                result.dangling.push(DanglingRef {
                    kind: EntityKind::Evaluation,
                    id: evaluation.id.to_string(),
                    field: "faultTree".into(),
                    target_kind: EntityKind::FaultTree,
                    target: tree.to_string(),
                });
            }
        }
    }

    for study in registry.sensitivity_studies() {
        note_system(
            registry,
            &mut result,
            EntityKind::SensitivityStudy,
            study.id.as_str(),
            "system",
            study.system.as_str(),
        );
    }

    for record in registry.model_uncertainties() {
        note_system(
            registry,
            &mut result,
            EntityKind::ModelUncertainty,
            record.system.as_str(),
            "system",
            record.system.as_str(),
        );
    }

    for record in registry.pre_operational() {
        note_system(
            registry,
            &mut result,
            EntityKind::PreOperationalAssumptions,
            record.system.as_str(),
            "system",
            record.system.as_str(),
        );
    }

    for (category, entry) in registry.documentation().entries() {
        let (ok, target_kind, target) = match &entry.key {
            FragmentKey::System(id) => (
                registry.system(id).is_some(),
                EntityKind::System,
                id.to_string(),
            ),
            FragmentKey::Dependency(id) => (
                registry.dependency(id).is_some(),
                EntityKind::Dependency,
                id.to_string(),
            ),
            FragmentKey::HumanAction(id) => (
                registry.human_action(id).is_some(),
                EntityKind::HumanAction,
                id.to_string(),
            ),
            FragmentKey::BasicEvent(id) => (
                registry.basic_event(id).is_some(),
                EntityKind::BasicEvent,
                id.to_string(),
            ),
            FragmentKey::Global => continue,
        };
        if ok {
            result.resolved += 1;
        } else {
            result.dangling.push(DanglingRef {
                kind: EntityKind::Documentation,
                id: category.key().to_string(),
                field: "ref".into(),
                target_kind,
                target,
            });
        }
    }

    result
}

fn note_system(
    registry: &ModelRegistry,
    result: &mut RefsResult,
    kind: EntityKind,
    id: &str,
    field: &str,
    target: &str,
) {
    if registry.system(&SystemId::from(target)).is_some() {
        result.resolved += 1;
    } else {
        result.dangling.push(DanglingRef {
            kind,
            id: id.to_string(),
            field: field.to_string(),
            target_kind: EntityKind::System,
            target: target.to_string(),
        });
    }
}
