//! System definitions: identity, boundaries, success criteria, and the
//! modeled component/failure-mode map.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::{ComponentId, SuccessCriterionId, SystemId};

/// A success criterion: either stated inline, or a reference into the
/// success-criteria PRA element.
///
/// The two arms are explicit on the wire (`{"inline": ...}` vs
/// `{"byReference": ...}`); there is no bare-string fallback, so
/// consumers must handle both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuccessCriterion {
    /// Criterion text carried by this record.
    Inline { text: String },
    /// Criterion defined elsewhere; the id is issued by the
    /// success-criteria element and is not resolvable in this model.
    ByReference { id: SuccessCriterionId },
}

/// One modeled component: its failure modes and why it is in the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    /// Failure-mode tags, e.g. "fails-to-start", "fails-to-run".
    pub failure_modes: BTreeSet<String>,
    /// Why this component is in the model.
    pub justification: String,
    /// Shared-component group tag. A component modeled under more than
    /// one system must carry the same tag in every occurrence, or the
    /// checker flags the sharing as unjustified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// One plant system.
///
/// Covers the SY-C1 identity items: function, boundary, schematic
/// reference, success criterion, mission time, and the component map
/// with inclusion/exclusion justifications. A definition that models
/// no components and justifies no exclusions is rejected at insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDefinition {
    pub id: SystemId,
    pub name: String,
    pub description: String,
    /// Boundary statements: what is inside the system and what is not.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boundaries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_criterion: Option<SuccessCriterion>,
    /// Mission time in hours, for systems that have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_time_hours: Option<f64>,
    /// Drawing or schematic reference, e.g. a flowsheet number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schematic: Option<String>,
    /// Component id -> failure modes and inclusion justification.
    /// Component ids are unique within this system only.
    #[serde(
        rename = "modeledComponentsAndFailures",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub modeled_components: BTreeMap<ComponentId, ComponentEntry>,
    /// Justifications for components left out of the model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_components: Vec<String>,
    /// Justifications for failure modes left out of the model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_failure_modes: Vec<String>,
}

impl SystemDefinition {
    /// True when the record neither models components nor justifies
    /// any exclusion.
    pub fn is_unmodeled(&self) -> bool {
        self.modeled_components.is_empty()
            && self.excluded_components.is_empty()
            && self.excluded_failure_modes.is_empty()
    }
}
