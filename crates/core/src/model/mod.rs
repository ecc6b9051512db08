//! Record types for the systems-analysis model.

pub mod assessment;
pub mod dependency;
pub mod event;
pub mod fault_tree;
pub mod system;
pub mod treatment;

pub use assessment::{
    ModelUncertainty, PreOperationalAssumptions, SystemModelEvaluation, SystemSensitivityStudy,
};
pub use dependency::{DependencyKind, LoopResolution, SystemDependency};
pub use event::{BasicEvent, HumanAction};
pub use fault_tree::{CutSet, FaultTree, GateKind, TreeNode};
pub use system::{ComponentEntry, SuccessCriterion, SystemDefinition};
pub use treatment::PassiveSystemsTreatment;
