//! CheckReport -- aggregated output from the consistency passes.
//!
//! Each pass deposits its result struct; `extract_diagnostics` then
//! flattens everything into one deterministically sorted diagnostic
//! list for display and exit-code decisions.

use serde::Serialize;

use prax_core::EntityKind;

use crate::components::ComponentsResult;
use crate::loops::LoopsResult;
use crate::refs::RefsResult;
use crate::trees::{CutMemberIssue, TreesResult};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One violated consistency rule, tied to the entity that violates it.
///
/// For findings that span several entities (dependency loops, shared
/// components), `kind` and `id` name the canonical head -- the
/// lexicographically smallest system in a cycle, the first system
/// modeling a shared component -- and `details` carries the full
/// member list.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub check: String,
    pub severity: Severity,
    pub kind: EntityKind,
    pub id: String,
    pub rule: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Aggregated consistency report.
///
/// Diagnostics are collected, never thrown: an inconsistent model is a
/// report to iterate on, not a failure to construct.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub refs: Option<RefsResult>,
    pub trees: Option<TreesResult>,
    pub loops: Option<LoopsResult>,
    pub components: Option<ComponentsResult>,
    pub checks_run: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        CheckReport {
            refs: None,
            trees: None,
            loops: None,
            components: None,
            checks_run: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Extract diagnostics from populated pass results.
    pub fn extract_diagnostics(&mut self) {
        self.diagnostics.clear();

        // refs: every dangling reference is an error
        if let Some(ref refs) = self.refs {
            for dangling in &refs.dangling {
                self.diagnostics.push(Diagnostic {
                    check: "refs".to_string(),
                    severity: Severity::Error,
                    kind: dangling.kind,
                    id: dangling.id.clone(),
                    rule: "dangling_reference".to_string(),
                    message: format!(
                        "{} '{}' references undeclared {} '{}' via {}",
                        dangling.kind, dangling.id, dangling.target_kind, dangling.target,
                        dangling.field
                    ),
                    details: Some(serde_json::json!({
                        "field": dangling.field,
                        "targetKind": dangling.target_kind,
                        "target": dangling.target,
                    })),
                });
            }
        }

        // trees: node-closure violations and invalid cut-set members
        if let Some(ref trees) = self.trees {
            for (tree_id, tree) in &trees.trees {
                for (node, child) in &tree.dangling_children {
                    self.diagnostics.push(Diagnostic {
                        check: "trees".to_string(),
                        severity: Severity::Error,
                        kind: EntityKind::FaultTree,
                        id: tree_id.clone(),
                        rule: "dangling_reference".to_string(),
                        message: format!(
                            "node '{}' references '{}', which is not a node of this tree",
                            node, child
                        ),
                        details: Some(serde_json::json!({
                            "node": node,
                            "child": child,
                        })),
                    });
                }
                for violation in &tree.cut_set_violations {
                    let why = match violation.issue {
                        CutMemberIssue::NotANode => "is not a node of this tree",
                        CutMemberIssue::NotALeaf => "names a gate, not a leaf",
                        CutMemberIssue::NoBasicEvent => {
                            "is a leaf with no registered basic event"
                        }
                    };
                    self.diagnostics.push(Diagnostic {
                        check: "trees".to_string(),
                        severity: Severity::Error,
                        kind: EntityKind::FaultTree,
                        id: tree_id.clone(),
                        rule: "invalid_cut_set".to_string(),
                        message: format!(
                            "cut set {}: member '{}' {}",
                            violation.cut_index, violation.member, why
                        ),
                        details: Some(serde_json::json!({
                            "cutIndex": violation.cut_index,
                            "member": violation.member,
                            "issue": violation.issue,
                        })),
                    });
                }
            }
        }

        // loops: cycles without a matching resolution are warnings
        if let Some(ref loops) = self.loops {
            for cycle in &loops.cycles {
                if cycle.resolved_by.is_some() {
                    continue;
                }
                self.diagnostics.push(Diagnostic {
                    check: "loops".to_string(),
                    severity: Severity::Warning,
                    kind: EntityKind::System,
                    id: cycle.systems.first().cloned().unwrap_or_default(),
                    rule: "unresolved_loop".to_string(),
                    message: format!(
                        "dependency loop {} has no loop-resolution record",
                        cycle.systems.join(" -> ")
                    ),
                    details: Some(serde_json::json!({
                        "systems": cycle.systems,
                    })),
                });
            }
        }

        // components: unjustified sharing is a warning
        if let Some(ref components) = self.components {
            for shared in &components.shared {
                if shared.justified {
                    continue;
                }
                self.diagnostics.push(Diagnostic {
                    check: "components".to_string(),
                    severity: Severity::Warning,
                    kind: EntityKind::System,
                    id: shared.systems.first().cloned().unwrap_or_default(),
                    rule: "shared_component".to_string(),
                    message: format!(
                        "component '{}' is modeled under {} systems ({}) without a common group tag",
                        shared.component,
                        shared.systems.len(),
                        shared.systems.join(", ")
                    ),
                    details: Some(serde_json::json!({
                        "component": shared.component,
                        "systems": shared.systems,
                        "groups": shared.groups,
                    })),
                });
            }
        }

        // Sort diagnostics for deterministic output
        self.diagnostics.sort_by(|a, b| {
            a.check
                .cmp(&b.check)
                .then_with(|| format!("{:?}", a.severity).cmp(&format!("{:?}", b.severity)))
                .then_with(|| a.id.cmp(&b.id))
                .then_with(|| a.message.cmp(&b.message))
        });
    }
}

impl Default for CheckReport {
    fn default() -> Self {
        Self::new()
    }
}
