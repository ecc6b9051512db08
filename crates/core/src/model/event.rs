//! Basic events and human actions: the leaf-level records the rest of
//! the model references.

use serde::{Deserialize, Serialize};

use crate::ids::{BasicEventId, HumanActionId, SystemId};

/// A leaf failure mode, owned by exactly one system.
///
/// The `module` and `cutset` fields carry modularization traceability:
/// which logic module the event was collapsed into and which cut-set
/// listing it appears in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicEvent {
    pub id: BasicEventId,
    pub system: SystemId,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutset: Option<String>,
}

/// An operator action credited by the model.
///
/// Detailed reliability analysis lives in the human-reliability PRA
/// element; this record exists so human-action references resolve
/// within this model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanAction {
    pub id: HumanActionId,
    pub description: String,
    /// The system the action is performed on, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemId>,
}
