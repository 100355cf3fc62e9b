//! Graph nodes.

use std::collections::{BTreeMap, BTreeSet};

use netform_foundation::{NodeIndex, OperatorDef};

/// Maps a neighboring node to the blob names (edge labels) connecting them.
///
/// Ordered so that neighbor iteration is ascending by index.
pub type NeighborMap = BTreeMap<NodeIndex, BTreeSet<String>>;

/// One operator invocation within a [`Graph`](crate::Graph).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    /// The operator this node represents.
    pub op: OperatorDef,
    /// Nodes producing blobs this node reads.
    pub parents: NeighborMap,
    /// Nodes reading blobs this node produces.
    pub children: NeighborMap,
    /// Nodes that must run earlier without feeding this node: they read or
    /// write a blob this node overwrites.
    pub runs_after: BTreeSet<NodeIndex>,
    /// Nodes that must run later without reading from this node: they
    /// overwrite a blob this node reads or writes.
    pub runs_before: BTreeSet<NodeIndex>,
    pub(crate) active: bool,
}

impl Node {
    /// Creates an active node with no neighbors.
    #[must_use]
    pub fn new(op: OperatorDef) -> Self {
        Self {
            op,
            parents: NeighborMap::new(),
            children: NeighborMap::new(),
            runs_after: BTreeSet::new(),
            runs_before: BTreeSet::new(),
            active: true,
        }
    }

    /// Returns true unless the node has been replaced by a rewrite.
    #[must_use]
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the operator type.
    #[must_use]
    pub fn op_type(&self) -> &str {
        &self.op.op_type
    }

    /// Returns true if `parent` feeds this node through `blob`.
    #[must_use]
    pub fn has_parent_via(&self, parent: NodeIndex, blob: &str) -> bool {
        self.parents
            .get(&parent)
            .is_some_and(|labels| labels.contains(blob))
    }

    /// Returns true if `child` reads `blob` from this node.
    #[must_use]
    pub fn has_child_via(&self, child: NodeIndex, blob: &str) -> bool {
        self.children
            .get(&child)
            .is_some_and(|labels| labels.contains(blob))
    }
}
