//! prax-check: consistency checker for systems-analysis models.
//!
//! The checker consumes a populated `ModelRegistry`, not raw JSON.
//! Each pass is a separate module producing a serializable result
//! struct; `check()` orchestrates all of them and aggregates
//! diagnostics into a [`CheckReport`]. Nothing here fails fast: every
//! violation in the model is collected so an author can fix a document
//! in one pass.
//!
//! Severities are fixed per rule: dangling references, fault-tree
//! closure violations, and invalid cut-set members are errors;
//! unresolved dependency loops and unjustified shared components are
//! warnings.

pub mod components;
pub mod loops;
pub mod refs;
pub mod report;
pub mod trees;

pub use components::{ComponentsResult, SharedComponent};
pub use loops::{CycleInfo, LoopsResult};
pub use refs::{DanglingRef, RefsResult};
pub use report::{CheckReport, Diagnostic, Severity};
pub use trees::{CutMemberIssue, CutSetViolation, TreeCheck, TreesResult};

use prax_core::ModelRegistry;

/// Names of the check passes, in run order.
pub const CHECKS: [&str; 4] = ["refs", "trees", "loops", "components"];

/// Run every consistency pass and aggregate the diagnostics.
pub fn check(registry: &ModelRegistry) -> CheckReport {
    let mut report = CheckReport::new();
    report.refs = Some(refs::check_references(registry));
    report.trees = Some(trees::check_fault_trees(registry));
    report.loops = Some(loops::check_dependency_loops(registry));
    report.components = Some(components::check_shared_components(registry));
    report.checks_run = CHECKS.iter().map(|name| name.to_string()).collect();
    report.extract_diagnostics();
    report
}

/// Run only the named passes. The passes are independent, so no
/// dependency resolution happens here; unknown names are ignored.
/// Valid names: "refs", "trees", "loops", "components".
pub fn check_selected(registry: &ModelRegistry, checks: &[&str]) -> CheckReport {
    let requested: std::collections::BTreeSet<&str> = checks.iter().copied().collect();
    let mut report = CheckReport::new();

    if requested.contains("refs") {
        report.refs = Some(refs::check_references(registry));
        report.checks_run.push("refs".to_string());
    }
    if requested.contains("trees") {
        report.trees = Some(trees::check_fault_trees(registry));
        report.checks_run.push("trees".to_string());
    }
    if requested.contains("loops") {
        report.loops = Some(loops::check_dependency_loops(registry));
        report.checks_run.push("loops".to_string());
    }
    if requested.contains("components") {
        report.components = Some(components::check_shared_components(registry));
        report.checks_run.push("components".to_string());
    }

    report.extract_diagnostics();
    report
}
