//! Fault-tree closure and cut-set validation.
//!
//! Two rules per tree: every child reference must name a node of the
//! same tree, and every cut-set member must be a childless node that
//! resolves to a registered basic event.

use std::collections::BTreeMap;

use serde::Serialize;

use prax_core::ModelRegistry;

/// Why a cut-set member is invalid. The tests run in order and stop at
/// the first failure, so each offending member yields exactly one
/// violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CutMemberIssue {
    /// The member does not name a node of the tree.
    NotANode,
    /// The member names a gate, not a childless leaf.
    NotALeaf,
    /// The member is a leaf with no registered basic event.
    NoBasicEvent,
}

#[derive(Debug, Clone, Serialize)]
pub struct CutSetViolation {
    /// Index of the cut set in the tree's listing.
    pub cut_index: usize,
    pub member: String,
    pub issue: CutMemberIssue,
}

/// Per-tree outcome.
#[derive(Debug, Clone, Serialize)]
pub struct TreeCheck {
    pub node_count: usize,
    pub leaf_count: usize,
    pub cut_set_count: usize,
    /// (node, referenced child) pairs where the child is not a node.
    pub dangling_children: Vec<(String, String)>,
    pub cut_set_violations: Vec<CutSetViolation>,
}

/// Outcome of the `trees` pass, keyed by tree id.
#[derive(Debug, Clone, Serialize)]
pub struct TreesResult {
    pub trees: BTreeMap<String, TreeCheck>,
}

pub fn check_fault_trees(registry: &ModelRegistry) -> TreesResult {
    let mut result = TreesResult {
        trees: BTreeMap::new(),
    };

    for tree in registry.fault_trees() {
        let mut check = TreeCheck {
            node_count: tree.nodes.len(),
            leaf_count: tree
                .nodes
                .values()
                .filter(|node| node.children.is_empty())
                .count(),
            cut_set_count: tree.cut_sets.len(),
            dangling_children: Vec::new(),
            cut_set_violations: Vec::new(),
        };

        for (node_id, node) in &tree.nodes {
            for child in &node.children {
                if !tree.nodes.contains_key(child.as_str()) {
                    check
                        .dangling_children
                        .push((node_id.to_string(), child.to_string()));
                }
            }
        }

        for (cut_index, cut) in tree.cut_sets.iter().enumerate() {
            for member in cut {
                let issue = if !tree.nodes.contains_key(member.as_str()) {
                    Some(CutMemberIssue::NotANode)
                } else if !tree.is_leaf(member.as_str()) {
                    Some(CutMemberIssue::NotALeaf)
                } else if registry.basic_event(member).is_none() {
                    Some(CutMemberIssue::NoBasicEvent)
                } else {
                    None
                };
                if let Some(issue) = issue {
                    check.cut_set_violations.push(CutSetViolation {
                        cut_index,
                        member: member.to_string(),
                        issue,
                    });
                }
            }
        }

        result.trees.insert(tree.id.to_string(), check);
    }

    result
}
