//! Passive-safety treatment records.

use serde::{Deserialize, Serialize};

use crate::ids::{PassiveTreatmentId, SystemId};

/// Documents an inherent or passive safety mechanism credited to one
/// system: natural circulation, reactivity feedback, thermal inertia.
///
/// Purely descriptive. Performance numbers live in the referenced
/// analyses, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassiveSystemsTreatment {
    pub id: PassiveTreatmentId,
    pub system: SystemId,
    pub description: String,
    /// Physical phenomena the mechanism relies on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phenomena: Vec<String>,
    /// Reference to the supporting thermal-hydraulic or neutronic
    /// performance analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_analysis: Option<String>,
    /// Reference to the supporting uncertainty analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty_analysis: Option<String>,
    /// Narrative evaluation of the uncertainty in crediting the
    /// mechanism.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty_evaluation: Option<String>,
}
