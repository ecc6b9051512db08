//! Identifier newtypes and kind-tagged references.
//!
//! Every registered entity kind gets its own id wrapper, so a reference
//! of the wrong kind is a compile error instead of a silent string
//! mix-up. The wrappers serialize as bare strings and implement
//! `Borrow<str>`, so maps keyed by them can be probed with `&str`.
//!
//! Two of the wrappers name scope-local identifiers rather than
//! registry entries: [`ComponentId`] is unique only within its owning
//! system, and [`NodeId`] only within its fault tree.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                $name(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                $name(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

id_type! {
    /// Names a declared plant system.
    SystemId
}

id_type! {
    /// Names a system-to-system dependency edge.
    DependencyId
}

id_type! {
    /// Names a logic-loop resolution record.
    LoopResolutionId
}

id_type! {
    /// Names a fault tree.
    FaultTreeId
}

id_type! {
    /// Names a basic event (leaf failure mode).
    BasicEventId
}

id_type! {
    /// Names a credited operator action.
    HumanActionId
}

id_type! {
    /// Names a passive-safety treatment record.
    PassiveTreatmentId
}

id_type! {
    /// Names a system-model evaluation record.
    EvaluationId
}

id_type! {
    /// Names a sensitivity study.
    SensitivityStudyId
}

id_type! {
    /// Names a success criterion defined by the success-criteria PRA
    /// element. Those criteria live outside this model, so these ids
    /// are stored opaquely and never resolved here.
    SuccessCriterionId
}

id_type! {
    /// Names a component within one system's model. Unique per system,
    /// not globally: the same id appearing under several systems marks
    /// a shared component.
    ComponentId
}

id_type! {
    /// Names a node within one fault tree. Unique per tree.
    NodeId
}

/// The entity kinds that appear in errors and diagnostics.
///
/// `Documentation` is not a registry map of its own; it tags
/// diagnostics raised against documentation fragment keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    System,
    Dependency,
    LoopResolution,
    FaultTree,
    BasicEvent,
    HumanAction,
    PassiveTreatment,
    Evaluation,
    SensitivityStudy,
    ModelUncertainty,
    PreOperationalAssumptions,
    Documentation,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::System => "system",
            EntityKind::Dependency => "dependency",
            EntityKind::LoopResolution => "loop resolution",
            EntityKind::FaultTree => "fault tree",
            EntityKind::BasicEvent => "basic event",
            EntityKind::HumanAction => "human action",
            EntityKind::PassiveTreatment => "passive treatment",
            EntityKind::Evaluation => "evaluation",
            EntityKind::SensitivityStudy => "sensitivity study",
            EntityKind::ModelUncertainty => "model uncertainty",
            EntityKind::PreOperationalAssumptions => "pre-operational assumptions",
            EntityKind::Documentation => "documentation",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a registered entity of a known kind.
///
/// Used where the kind is not fixed at compile time: registry lookups
/// driven by external input and diagnostic payloads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum Reference {
    System(SystemId),
    Dependency(DependencyId),
    LoopResolution(LoopResolutionId),
    FaultTree(FaultTreeId),
    BasicEvent(BasicEventId),
    HumanAction(HumanActionId),
    PassiveTreatment(PassiveTreatmentId),
    Evaluation(EvaluationId),
    SensitivityStudy(SensitivityStudyId),
}

impl Reference {
    pub fn kind(&self) -> EntityKind {
        match self {
            Reference::System(_) => EntityKind::System,
            Reference::Dependency(_) => EntityKind::Dependency,
            Reference::LoopResolution(_) => EntityKind::LoopResolution,
            Reference::FaultTree(_) => EntityKind::FaultTree,
            Reference::BasicEvent(_) => EntityKind::BasicEvent,
            Reference::HumanAction(_) => EntityKind::HumanAction,
            Reference::PassiveTreatment(_) => EntityKind::PassiveTreatment,
            Reference::Evaluation(_) => EntityKind::Evaluation,
            Reference::SensitivityStudy(_) => EntityKind::SensitivityStudy,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Reference::System(id) => id.as_str(),
            Reference::Dependency(id) => id.as_str(),
            Reference::LoopResolution(id) => id.as_str(),
            Reference::FaultTree(id) => id.as_str(),
            Reference::BasicEvent(id) => id.as_str(),
            Reference::HumanAction(id) => id.as_str(),
            Reference::PassiveTreatment(id) => id.as_str(),
            Reference::Evaluation(id) => id.as_str(),
            Reference::SensitivityStudy(id) => id.as_str(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind(), self.id())
    }
}
