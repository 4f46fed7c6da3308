//! Static node classification used by the event processor

use super::NodeConfig;
use crate::node::NodeId;
use std::collections::{BTreeSet, HashSet};

/// Own, private and blocked node sets plus the optional Echolink node.
/// Immutable for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct NodeClassification {
    my_nodes: HashSet<NodeId>,
    private_nodes: HashSet<NodeId>,
    blocked_nodes: HashSet<NodeId>,
    echolink: Option<NodeId>,
}

impl NodeClassification {
    pub fn new(
        my_nodes: impl IntoIterator<Item = NodeId>,
        private_nodes: impl IntoIterator<Item = NodeId>,
        blocked_nodes: impl IntoIterator<Item = NodeId>,
        echolink: Option<NodeId>,
    ) -> Self {
        Self {
            my_nodes: my_nodes.into_iter().collect(),
            private_nodes: private_nodes.into_iter().collect(),
            blocked_nodes: blocked_nodes.into_iter().collect(),
            echolink,
        }
    }

    pub fn is_blocked(&self, node: NodeId) -> bool {
        self.blocked_nodes.contains(&node)
    }

    /// Own and private nodes never produce connect/disconnect chatter
    pub fn is_suppressed(&self, node: NodeId) -> bool {
        self.my_nodes.contains(&node) || self.private_nodes.contains(&node)
    }

    pub fn is_echolink(&self, node: NodeId) -> bool {
        self.echolink == Some(node)
    }

    pub fn echolink(&self) -> Option<NodeId> {
        self.echolink
    }

    /// Nodes listed in more than one set, sorted
    pub fn overlaps(&self) -> Vec<NodeId> {
        let sets = [&self.my_nodes, &self.private_nodes, &self.blocked_nodes];
        let mut seen = HashSet::new();
        let mut dupes = BTreeSet::new();
        for set in sets {
            for &node in set {
                if !seen.insert(node) {
                    dupes.insert(node);
                }
            }
        }
        dupes.into_iter().collect()
    }
}

impl From<&NodeConfig> for NodeClassification {
    fn from(nodes: &NodeConfig) -> Self {
        Self::new(
            nodes.my_nodes.iter().copied(),
            nodes.private_nodes.iter().copied(),
            nodes.blocked_nodes.iter().copied(),
            nodes.echolink,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let c = NodeClassification::new([2000], [1999], [666], Some(3000000));
        assert!(c.is_suppressed(2000));
        assert!(c.is_suppressed(1999));
        assert!(!c.is_suppressed(666));
        assert!(c.is_blocked(666));
        assert!(!c.is_blocked(2000));
        assert!(c.is_echolink(3000000));
        assert!(!c.is_echolink(2000));
    }

    #[test]
    fn test_no_echolink() {
        let c = NodeClassification::new([], [], [], None);
        assert!(!c.is_echolink(0));
        assert_eq!(c.echolink(), None);
    }

    #[test]
    fn test_overlaps() {
        let c = NodeClassification::new([1, 2], [2, 3], [3, 4], None);
        assert_eq!(c.overlaps(), vec![2, 3]);
        let clean = NodeClassification::new([1], [2], [3], None);
        assert!(clean.overlaps().is_empty());
    }
}
