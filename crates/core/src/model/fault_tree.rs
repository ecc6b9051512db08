//! Fault trees: per-system gate/leaf node maps with analyst-supplied
//! minimal cut sets.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::{BasicEventId, FaultTreeId, NodeId, SystemId};

/// Node type in a fault tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GateKind {
    And,
    Or,
    /// Leaf node standing for a basic event.
    Basic,
}

/// One fault-tree node. Children name other node ids of the same tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub kind: GateKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
}

/// A set of basic events whose joint occurrence fails the top event.
pub type CutSet = BTreeSet<BasicEventId>;

/// A fault tree scoped to one system.
///
/// The top node is either designated explicitly via `top` or
/// discovered as the single node no other node lists as a child; a
/// tree where neither works is rejected at insert. Cut sets are
/// supplied by the analyst, not computed here -- each member must name
/// a childless node of this tree that also resolves to a registered
/// basic event, which the checker enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultTree {
    pub id: FaultTreeId,
    pub name: String,
    pub system: SystemId,
    /// Explicit top designation; required when root discovery finds
    /// more than one candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<NodeId>,
    pub nodes: BTreeMap<NodeId, TreeNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cut_sets: Vec<CutSet>,
}

impl FaultTree {
    /// Node ids no node of this tree lists as a child.
    pub fn root_candidates(&self) -> Vec<&NodeId> {
        let referenced: BTreeSet<&NodeId> = self
            .nodes
            .values()
            .flat_map(|node| node.children.iter())
            .collect();
        self.nodes
            .keys()
            .filter(|id| !referenced.contains(*id))
            .collect()
    }

    /// The effective top node: the explicit designation when present,
    /// otherwise the single root candidate.
    pub fn top_node(&self) -> Option<&NodeId> {
        if let Some(top) = &self.top {
            return Some(top);
        }
        let mut roots = self.root_candidates();
        if roots.len() == 1 {
            roots.pop()
        } else {
            None
        }
    }

    /// True when `id` names a childless node of this tree.
    pub fn is_leaf(&self, id: &str) -> bool {
        self.nodes
            .get(id)
            .map(|node| node.children.is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(kind: GateKind, description: &str, children: &[&str]) -> TreeNode {
        TreeNode {
            kind,
            description: description.into(),
            children: children.iter().map(|c| NodeId::from(*c)).collect(),
        }
    }

    fn two_cooler_tree() -> FaultTree {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            NodeId::from("top"),
            gate(GateKind::And, "both shutdown coolers fail", &["cooler-a", "cooler-b"]),
        );
        nodes.insert(NodeId::from("cooler-a"), gate(GateKind::Basic, "cooler A fails", &[]));
        nodes.insert(NodeId::from("cooler-b"), gate(GateKind::Basic, "cooler B fails", &[]));
        FaultTree {
            id: FaultTreeId::from("ft-shutdown-coolers"),
            name: "Loss of shutdown cooling".into(),
            system: SystemId::from("sys-shutdown-coolers"),
            top: None,
            nodes,
            cut_sets: vec![],
        }
    }

    #[test]
    fn single_root_is_discovered() {
        let tree = two_cooler_tree();
        assert_eq!(tree.root_candidates(), vec![&NodeId::from("top")]);
        assert_eq!(tree.top_node(), Some(&NodeId::from("top")));
    }

    #[test]
    fn explicit_top_wins_over_discovery() {
        let mut tree = two_cooler_tree();
        tree.top = Some(NodeId::from("cooler-a"));
        assert_eq!(tree.top_node(), Some(&NodeId::from("cooler-a")));
    }

    #[test]
    fn leaves_are_childless_nodes() {
        let tree = two_cooler_tree();
        assert!(tree.is_leaf("cooler-a"));
        assert!(!tree.is_leaf("top"));
        assert!(!tree.is_leaf("not-a-node"));
    }
}
