//! System-to-system dependencies and logic-loop resolutions.

use serde::{Deserialize, Serialize};

use crate::ids::{DependencyId, HumanActionId, LoopResolutionId, SystemId};

/// How one system depends on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyKind {
    /// The supporting system's output is needed for function.
    Functional,
    /// Shared location exposes both systems to the same hazard.
    Spatial,
    /// The dependency is carried by a credited operator action.
    Human,
    Other,
}

/// A directed dependency edge: `dependent_system` requires
/// `supporting_system`.
///
/// A single edge from a system to itself is rejected at insert. Cycles
/// across several edges are legal in the raw graph; each detected
/// cycle must be answered by a [`LoopResolution`] or the checker
/// reports it as unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDependency {
    pub id: DependencyId,
    pub dependent_system: SystemId,
    pub supporting_system: SystemId,
    pub kind: DependencyKind,
    pub description: String,
    /// For human-kind edges: the credited operator action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_action: Option<HumanActionId>,
}

/// Records how a dependency loop was broken in the logic model.
///
/// `systems` names the members of the loop. The checker matches it
/// set-wise against detected cycles, so member order does not matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopResolution {
    pub id: LoopResolutionId,
    pub systems: Vec<SystemId>,
    /// How the loop was resolved, e.g. which support path was truncated
    /// under which boundary condition.
    pub resolution: String,
}
