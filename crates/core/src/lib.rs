//! prax-core: systems-analysis model core library.
//!
//! Typed records for the systems-analysis PRA element (system
//! definitions, dependencies, fault trees, basic events, human
//! actions, passive-safety treatments, evaluations), the id newtypes
//! that cross-link them, the closed documentation-category map, and
//! the [`ModelRegistry`] that holds one authored model revision.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`ModelRegistry`] -- per-kind id-to-record maps with atomic
//!   insert/replace
//! - [`ModelError`] -- construction-time rejection reasons
//! - [`DocumentationStore`] / [`DocumentationCategory`] -- the SY-C1
//!   category map
//! - record types: [`SystemDefinition`], [`SystemDependency`],
//!   [`FaultTree`], [`BasicEvent`], [`PassiveSystemsTreatment`], ...
//! - id newtypes: [`SystemId`], [`DependencyId`], [`FaultTreeId`],
//!   [`BasicEventId`], ...
//!
//! Cross-record consistency (dangling references, cut sets, dependency
//! loops, shared components) is the `prax-check` crate's job; nothing
//! here reports those.

/// Model format version stamped on every bundle (e.g., "1.0").
pub const PRAX_VERSION: &str = "1.0";
/// Bundle schema version (semver, e.g., "1.0.0").
pub const PRAX_BUNDLE_VERSION: &str = "1.0.0";

pub mod documentation;
pub mod error;
pub mod ids;
pub mod model;
pub mod registry;

// ── Convenience re-exports: identifiers ──────────────────────────────

pub use ids::{
    BasicEventId, ComponentId, DependencyId, EntityKind, EvaluationId, FaultTreeId,
    HumanActionId, LoopResolutionId, NodeId, PassiveTreatmentId, Reference, SensitivityStudyId,
    SuccessCriterionId, SystemId,
};

// ── Convenience re-exports: records and containers ───────────────────

pub use documentation::{
    CategoryScope, DocumentationCategory, DocumentationStore, Fragment, FragmentEntry,
    FragmentKey,
};
pub use error::ModelError;
pub use model::{
    BasicEvent, ComponentEntry, CutSet, DependencyKind, FaultTree, GateKind, HumanAction,
    LoopResolution, ModelUncertainty, PassiveSystemsTreatment, PreOperationalAssumptions,
    SuccessCriterion, SystemDefinition, SystemDependency, SystemModelEvaluation,
    SystemSensitivityStudy, TreeNode,
};
pub use registry::ModelRegistry;
