//! The model registry: per-kind id-to-record maps with atomic
//! insert/replace, plus the query surface consumers build on.

use std::collections::BTreeMap;

use crate::documentation::{
    DocumentationCategory, DocumentationStore, Fragment, FragmentEntry, FragmentKey,
};
use crate::error::ModelError;
use crate::ids::{
    BasicEventId, DependencyId, EntityKind, EvaluationId, FaultTreeId, HumanActionId,
    LoopResolutionId, PassiveTreatmentId, Reference, SensitivityStudyId, SystemId,
};
use crate::model::{
    BasicEvent, FaultTree, HumanAction, LoopResolution, ModelUncertainty,
    PassiveSystemsTreatment, PreOperationalAssumptions, SystemDefinition, SystemDependency,
    SystemModelEvaluation, SystemSensitivityStudy,
};

/// One revision of a systems-analysis model.
///
/// Every `insert_*` is atomic: the record is validated first and a
/// rejection leaves the registry untouched. Only intra-record rules
/// are enforced here (id uniqueness, self-dependency, top-node
/// discoverability, non-empty system models); anything spanning
/// records is the consistency checker's job, so partially authored
/// models always load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelRegistry {
    systems: BTreeMap<SystemId, SystemDefinition>,
    dependencies: BTreeMap<DependencyId, SystemDependency>,
    loop_resolutions: BTreeMap<LoopResolutionId, LoopResolution>,
    fault_trees: BTreeMap<FaultTreeId, FaultTree>,
    basic_events: BTreeMap<BasicEventId, BasicEvent>,
    human_actions: BTreeMap<HumanActionId, HumanAction>,
    passive_treatments: BTreeMap<PassiveTreatmentId, PassiveSystemsTreatment>,
    evaluations: BTreeMap<EvaluationId, SystemModelEvaluation>,
    sensitivity_studies: BTreeMap<SensitivityStudyId, SystemSensitivityStudy>,
    model_uncertainties: BTreeMap<SystemId, ModelUncertainty>,
    pre_operational_assumptions: BTreeMap<SystemId, PreOperationalAssumptions>,
    documentation: DocumentationStore,
}

impl ModelRegistry {
    pub fn new() -> ModelRegistry {
        ModelRegistry::default()
    }

    // ── Inserts and replaces ────────────────────────────────────────

    pub fn insert_system(&mut self, system: SystemDefinition) -> Result<(), ModelError> {
        if self.systems.contains_key(&system.id) {
            return Err(ModelError::DuplicateId {
                kind: EntityKind::System,
                id: system.id.to_string(),
            });
        }
        Self::validate_system(&system)?;
        self.systems.insert(system.id.clone(), system);
        Ok(())
    }

    /// Validated upsert: same record rules as insert, minus the
    /// duplicate-id test. A replace can orphan references into the old
    /// record; that surfaces in the next consistency check.
    pub fn replace_system(&mut self, system: SystemDefinition) -> Result<(), ModelError> {
        Self::validate_system(&system)?;
        self.systems.insert(system.id.clone(), system);
        Ok(())
    }

    pub fn insert_dependency(&mut self, dependency: SystemDependency) -> Result<(), ModelError> {
        if self.dependencies.contains_key(&dependency.id) {
            return Err(ModelError::DuplicateId {
                kind: EntityKind::Dependency,
                id: dependency.id.to_string(),
            });
        }
        Self::validate_dependency(&dependency)?;
        self.dependencies.insert(dependency.id.clone(), dependency);
        Ok(())
    }

    pub fn replace_dependency(&mut self, dependency: SystemDependency) -> Result<(), ModelError> {
        Self::validate_dependency(&dependency)?;
        self.dependencies.insert(dependency.id.clone(), dependency);
        Ok(())
    }

    pub fn insert_loop_resolution(&mut self, resolution: LoopResolution) -> Result<(), ModelError> {
        if self.loop_resolutions.contains_key(&resolution.id) {
            return Err(ModelError::DuplicateId {
                kind: EntityKind::LoopResolution,
                id: resolution.id.to_string(),
            });
        }
        self.loop_resolutions.insert(resolution.id.clone(), resolution);
        Ok(())
    }

    pub fn insert_fault_tree(&mut self, tree: FaultTree) -> Result<(), ModelError> {
        if self.fault_trees.contains_key(&tree.id) {
            return Err(ModelError::DuplicateId {
                kind: EntityKind::FaultTree,
                id: tree.id.to_string(),
            });
        }
        Self::validate_fault_tree(&tree)?;
        self.fault_trees.insert(tree.id.clone(), tree);
        Ok(())
    }

    pub fn replace_fault_tree(&mut self, tree: FaultTree) -> Result<(), ModelError> {
        Self::validate_fault_tree(&tree)?;
        self.fault_trees.insert(tree.id.clone(), tree);
        Ok(())
    }

    pub fn insert_basic_event(&mut self, event: BasicEvent) -> Result<(), ModelError> {
        if self.basic_events.contains_key(&event.id) {
            return Err(ModelError::DuplicateId {
                kind: EntityKind::BasicEvent,
                id: event.id.to_string(),
            });
        }
        self.basic_events.insert(event.id.clone(), event);
        Ok(())
    }

    pub fn insert_human_action(&mut self, action: HumanAction) -> Result<(), ModelError> {
        if self.human_actions.contains_key(&action.id) {
            return Err(ModelError::DuplicateId {
                kind: EntityKind::HumanAction,
                id: action.id.to_string(),
            });
        }
        self.human_actions.insert(action.id.clone(), action);
        Ok(())
    }

    pub fn insert_passive_treatment(
        &mut self,
        treatment: PassiveSystemsTreatment,
    ) -> Result<(), ModelError> {
        if self.passive_treatments.contains_key(&treatment.id) {
            return Err(ModelError::DuplicateId {
                kind: EntityKind::PassiveTreatment,
                id: treatment.id.to_string(),
            });
        }
        self.passive_treatments.insert(treatment.id.clone(), treatment);
        Ok(())
    }

    pub fn insert_evaluation(&mut self, evaluation: SystemModelEvaluation) -> Result<(), ModelError> {
        if self.evaluations.contains_key(&evaluation.id) {
            return Err(ModelError::DuplicateId {
                kind: EntityKind::Evaluation,
                id: evaluation.id.to_string(),
            });
        }
        self.evaluations.insert(evaluation.id.clone(), evaluation);
        Ok(())
    }

    pub fn insert_sensitivity_study(
        &mut self,
        study: SystemSensitivityStudy,
    ) -> Result<(), ModelError> {
        if self.sensitivity_studies.contains_key(&study.id) {
            return Err(ModelError::DuplicateId {
                kind: EntityKind::SensitivityStudy,
                id: study.id.to_string(),
            });
        }
        self.sensitivity_studies.insert(study.id.clone(), study);
        Ok(())
    }

    pub fn insert_model_uncertainty(&mut self, record: ModelUncertainty) -> Result<(), ModelError> {
        if self.model_uncertainties.contains_key(&record.system) {
            return Err(ModelError::DuplicateId {
                kind: EntityKind::ModelUncertainty,
                id: record.system.to_string(),
            });
        }
        self.model_uncertainties.insert(record.system.clone(), record);
        Ok(())
    }

    pub fn insert_pre_operational_assumptions(
        &mut self,
        record: PreOperationalAssumptions,
    ) -> Result<(), ModelError> {
        if self.pre_operational_assumptions.contains_key(&record.system) {
            return Err(ModelError::DuplicateId {
                kind: EntityKind::PreOperationalAssumptions,
                id: record.system.to_string(),
            });
        }
        self.pre_operational_assumptions
            .insert(record.system.clone(), record);
        Ok(())
    }

    // ── Record validation ───────────────────────────────────────────

    fn validate_system(system: &SystemDefinition) -> Result<(), ModelError> {
        if system.is_unmodeled() {
            return Err(ModelError::EmptySystemModel {
                id: system.id.to_string(),
            });
        }
        Ok(())
    }

    fn validate_dependency(dependency: &SystemDependency) -> Result<(), ModelError> {
        if dependency.dependent_system == dependency.supporting_system {
            return Err(ModelError::SelfDependency {
                id: dependency.id.to_string(),
                system: dependency.dependent_system.to_string(),
            });
        }
        Ok(())
    }

    fn validate_fault_tree(tree: &FaultTree) -> Result<(), ModelError> {
        if tree.nodes.is_empty() {
            return Err(ModelError::MissingTopNode {
                id: tree.id.to_string(),
                reason: "tree has no nodes".into(),
            });
        }
        if let Some(top) = &tree.top {
            if !tree.nodes.contains_key(top.as_str()) {
                return Err(ModelError::MissingTopNode {
                    id: tree.id.to_string(),
                    reason: format!("designated top '{}' is not a node of this tree", top),
                });
            }
            return Ok(());
        }
        let roots = tree.root_candidates();
        match roots.len() {
            0 => Err(ModelError::MissingTopNode {
                id: tree.id.to_string(),
                reason: "every node is referenced as a child; no root is discoverable".into(),
            }),
            1 => Ok(()),
            _ => {
                let candidates: Vec<&str> = roots.iter().map(|id| id.as_str()).collect();
                Err(ModelError::MissingTopNode {
                    id: tree.id.to_string(),
                    reason: format!(
                        "multiple root candidates ({}); designate one as top",
                        candidates.join(", ")
                    ),
                })
            }
        }
    }

    // ── Documentation ───────────────────────────────────────────────

    /// File a fragment under (category, key). The key must match the
    /// category's scope and resolve to a registered record.
    pub fn put_fragment(
        &mut self,
        category: DocumentationCategory,
        key: FragmentKey,
        fragment: Fragment,
    ) -> Result<(), ModelError> {
        self.validate_fragment_key(category, &key)?;
        self.documentation.push(category, FragmentEntry { key, fragment });
        Ok(())
    }

    /// Re-attach a fragment without reference resolution. Reloading a
    /// saved document must not fail on keys whose targets were never
    /// authored; the consistency checker reports those afterward.
    /// Scope mismatches are still rejected.
    pub fn restore_fragment(
        &mut self,
        category: DocumentationCategory,
        key: FragmentKey,
        fragment: Fragment,
    ) -> Result<(), ModelError> {
        if key.scope() != category.scope() {
            return Err(Self::scope_mismatch(category, &key));
        }
        self.documentation.push(category, FragmentEntry { key, fragment });
        Ok(())
    }

    fn validate_fragment_key(
        &self,
        category: DocumentationCategory,
        key: &FragmentKey,
    ) -> Result<(), ModelError> {
        if key.scope() != category.scope() {
            return Err(Self::scope_mismatch(category, key));
        }
        let resolves = match key {
            FragmentKey::System(id) => self.systems.contains_key(id),
            FragmentKey::Dependency(id) => self.dependencies.contains_key(id),
            FragmentKey::HumanAction(id) => self.human_actions.contains_key(id),
            FragmentKey::BasicEvent(id) => self.basic_events.contains_key(id),
            FragmentKey::Global => true,
        };
        if !resolves {
            return Err(ModelError::InvalidReference {
                category: category.key().to_string(),
                message: match key.id() {
                    Some(id) => {
                        format!("key '{}' does not resolve to a registered {}", id, key.scope())
                    }
                    None => "key does not resolve".to_string(),
                },
            });
        }
        Ok(())
    }

    fn scope_mismatch(category: DocumentationCategory, key: &FragmentKey) -> ModelError {
        ModelError::InvalidReference {
            category: category.key().to_string(),
            message: format!(
                "category is keyed by {}, got a {} key",
                category.scope(),
                key.scope()
            ),
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn system(&self, id: &SystemId) -> Option<&SystemDefinition> {
        self.systems.get(id)
    }

    pub fn dependency(&self, id: &DependencyId) -> Option<&SystemDependency> {
        self.dependencies.get(id)
    }

    pub fn loop_resolution(&self, id: &LoopResolutionId) -> Option<&LoopResolution> {
        self.loop_resolutions.get(id)
    }

    pub fn fault_tree(&self, id: &FaultTreeId) -> Option<&FaultTree> {
        self.fault_trees.get(id)
    }

    pub fn basic_event(&self, id: &BasicEventId) -> Option<&BasicEvent> {
        self.basic_events.get(id)
    }

    pub fn human_action(&self, id: &HumanActionId) -> Option<&HumanAction> {
        self.human_actions.get(id)
    }

    pub fn passive_treatment(&self, id: &PassiveTreatmentId) -> Option<&PassiveSystemsTreatment> {
        self.passive_treatments.get(id)
    }

    pub fn evaluation(&self, id: &EvaluationId) -> Option<&SystemModelEvaluation> {
        self.evaluations.get(id)
    }

    pub fn sensitivity_study(&self, id: &SensitivityStudyId) -> Option<&SystemSensitivityStudy> {
        self.sensitivity_studies.get(id)
    }

    pub fn model_uncertainty(&self, system: &SystemId) -> Option<&ModelUncertainty> {
        self.model_uncertainties.get(system)
    }

    pub fn pre_operational_assumptions(
        &self,
        system: &SystemId,
    ) -> Option<&PreOperationalAssumptions> {
        self.pre_operational_assumptions.get(system)
    }

    pub fn systems(&self) -> impl Iterator<Item = &SystemDefinition> {
        self.systems.values()
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &SystemDependency> {
        self.dependencies.values()
    }

    pub fn loop_resolutions(&self) -> impl Iterator<Item = &LoopResolution> {
        self.loop_resolutions.values()
    }

    pub fn fault_trees(&self) -> impl Iterator<Item = &FaultTree> {
        self.fault_trees.values()
    }

    pub fn basic_events(&self) -> impl Iterator<Item = &BasicEvent> {
        self.basic_events.values()
    }

    pub fn human_actions(&self) -> impl Iterator<Item = &HumanAction> {
        self.human_actions.values()
    }

    pub fn passive_treatments(&self) -> impl Iterator<Item = &PassiveSystemsTreatment> {
        self.passive_treatments.values()
    }

    pub fn evaluations(&self) -> impl Iterator<Item = &SystemModelEvaluation> {
        self.evaluations.values()
    }

    pub fn sensitivity_studies(&self) -> impl Iterator<Item = &SystemSensitivityStudy> {
        self.sensitivity_studies.values()
    }

    pub fn model_uncertainties(&self) -> impl Iterator<Item = &ModelUncertainty> {
        self.model_uncertainties.values()
    }

    pub fn pre_operational(&self) -> impl Iterator<Item = &PreOperationalAssumptions> {
        self.pre_operational_assumptions.values()
    }

    pub fn documentation(&self) -> &DocumentationStore {
        &self.documentation
    }

    /// Whether a kind-tagged reference resolves in this registry.
    pub fn contains_reference(&self, reference: &Reference) -> bool {
        match reference {
            Reference::System(id) => self.systems.contains_key(id),
            Reference::Dependency(id) => self.dependencies.contains_key(id),
            Reference::LoopResolution(id) => self.loop_resolutions.contains_key(id),
            Reference::FaultTree(id) => self.fault_trees.contains_key(id),
            Reference::BasicEvent(id) => self.basic_events.contains_key(id),
            Reference::HumanAction(id) => self.human_actions.contains_key(id),
            Reference::PassiveTreatment(id) => self.passive_treatments.contains_key(id),
            Reference::Evaluation(id) => self.evaluations.contains_key(id),
            Reference::SensitivityStudy(id) => self.sensitivity_studies.contains_key(id),
        }
    }

    /// Fault trees scoped to `system`, in id order.
    pub fn fault_trees_for_system(&self, system: &SystemId) -> Vec<&FaultTree> {
        self.fault_trees
            .values()
            .filter(|tree| tree.system == *system)
            .collect()
    }

    /// Dependency adjacency: dependent system -> supporting systems,
    /// one entry per edge, in dependency-id order.
    pub fn dependency_adjacency(&self) -> BTreeMap<&SystemId, Vec<&SystemId>> {
        let mut adjacency: BTreeMap<&SystemId, Vec<&SystemId>> = BTreeMap::new();
        for dependency in self.dependencies.values() {
            adjacency
                .entry(&dependency.dependent_system)
                .or_default()
                .push(&dependency.supporting_system);
        }
        adjacency
    }

    /// The per-system documentation view, in category order.
    pub fn fragments_for_system(&self, id: &SystemId) -> Vec<(DocumentationCategory, &Fragment)> {
        self.documentation.fragments_for_system(id)
    }
}
