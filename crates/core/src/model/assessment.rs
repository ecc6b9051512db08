//! Evaluation, sensitivity-study, and per-system assessment records.
//!
//! All numeric results in this module are produced by external
//! quantification tools and stored opaquely; nothing here is derived
//! or recomputed.

use serde::{Deserialize, Serialize};

use crate::ids::{EvaluationId, FaultTreeId, SensitivityStudyId, SystemId};

/// Results of evaluating one system model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemModelEvaluation {
    pub id: EvaluationId,
    pub system: SystemId,
    /// The fault tree that was quantified, when one applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_tree: Option<FaultTreeId>,
    pub description: String,
    /// Top-event probability as reported by the quantification engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_event_probability: Option<f64>,
    /// Dominant contributors called out by the evaluation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub significant_contributors: Vec<String>,
}

/// A sensitivity study over one system model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSensitivityStudy {
    pub id: SensitivityStudyId,
    pub system: SystemId,
    pub description: String,
    /// The varied parameter, e.g. a failure rate or a mission time.
    pub varied_parameter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<String>,
}

/// Sources of model uncertainty and related assumptions for one system
/// (the SY-C2 record). One per system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUncertainty {
    pub system: SystemId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_assumptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasonable_alternatives: Vec<String>,
}

/// Assumptions made before plant operating experience existed, and the
/// limitations they place on the model (the SY-C3 record). One per
/// system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreOperationalAssumptions {
    pub system: SystemId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assumptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub limitations: Vec<String>,
}
