//! Subgraph boundary queries and replacement.
//!
//! Rewrite rules work on a set of member nodes. These helpers describe what
//! crosses the boundary of that set and splice a single replacement node in
//! its place.

use std::collections::BTreeSet;

use netform_foundation::{NodeIndex, OperatorDef, Result};

use crate::graph::Graph;

impl Graph {
    /// Returns the blobs read by `members` that are not produced inside it.
    ///
    /// Blobs are listed in first-seen order, walking members in the order
    /// given and each member's inputs in argument order.
    ///
    /// # Errors
    ///
    /// Returns an error if any member index is out of range.
    pub fn subgraph_inputs(&self, members: &[NodeIndex]) -> Result<Vec<String>> {
        let set: BTreeSet<NodeIndex> = members.iter().copied().collect();
        let mut blobs: Vec<String> = Vec::new();

        for &index in members {
            let node = self.node(index)?;
            for blob in &node.op.inputs {
                let internal = node
                    .parents
                    .iter()
                    .any(|(parent, labels)| set.contains(parent) && labels.contains(blob));
                if !internal && !blobs.contains(blob) {
                    blobs.push(blob.clone());
                }
            }
        }

        Ok(blobs)
    }

    /// Returns the blobs produced inside `members` that are visible outside it.
    ///
    /// A blob is visible if an active non-member reads it or it is an
    /// external output of the network.
    ///
    /// # Errors
    ///
    /// Returns an error if any member index is out of range.
    pub fn subgraph_outputs(&self, members: &[NodeIndex]) -> Result<Vec<String>> {
        let set: BTreeSet<NodeIndex> = members.iter().copied().collect();
        let mut blobs: Vec<String> = Vec::new();

        for &index in members {
            let node = self.node(index)?;
            for blob in &node.op.outputs {
                let consumed_outside = node.children.iter().any(|(child, labels)| {
                    !set.contains(child) && self.is_active(*child) && labels.contains(blob)
                });
                let external = self.external_outputs.contains(blob);
                if (consumed_outside || external) && !blobs.contains(blob) {
                    blobs.push(blob.clone());
                }
            }
        }

        Ok(blobs)
    }

    /// Replaces `members` with a single new node running `op`.
    ///
    /// Members are deactivated. Every edge from an active non-member parent
    /// is reconnected to the new node if `op` still reads that blob, and
    /// every edge to an active non-member child is reconnected if `op` still
    /// writes it. Orderings between members and active non-members move to
    /// the new node unchanged.
    /// Returns the index of the new node.
    ///
    /// # Errors
    ///
    /// Returns an error if any member index is out of range. The graph is
    /// left untouched in that case.
    pub fn replace_subgraph(
        &mut self,
        members: &[NodeIndex],
        op: OperatorDef,
    ) -> Result<NodeIndex> {
        let set: BTreeSet<NodeIndex> = members.iter().copied().collect();
        let mut incoming: Vec<(NodeIndex, String)> = Vec::new();
        let mut outgoing: Vec<(NodeIndex, String)> = Vec::new();
        let mut earlier: BTreeSet<NodeIndex> = BTreeSet::new();
        let mut later: BTreeSet<NodeIndex> = BTreeSet::new();

        for &index in members {
            let node = self.node(index)?;
            let outside = |other: &NodeIndex| !set.contains(other) && self.is_active(*other);
            earlier.extend(node.runs_after.iter().copied().filter(outside));
            later.extend(node.runs_before.iter().copied().filter(outside));
            for (&parent, labels) in &node.parents {
                if !set.contains(&parent) && self.is_active(parent) {
                    incoming.extend(labels.iter().map(|blob| (parent, blob.clone())));
                }
            }
            for (&child, labels) in &node.children {
                if !set.contains(&child) && self.is_active(child) {
                    outgoing.extend(labels.iter().map(|blob| (child, blob.clone())));
                }
            }
        }

        self.deactivate_all(members)?;
        let replacement = self.push_node(op);

        for (parent, blob) in incoming {
            if self.node(replacement)?.op.reads(&blob) {
                self.add_edge(parent, replacement, &blob)?;
            }
        }
        for (child, blob) in outgoing {
            if self.node(replacement)?.op.writes(&blob) {
                self.add_edge(replacement, child, &blob)?;
            }
        }
        for first in earlier {
            self.add_ordering(first, replacement)?;
        }
        for then in later {
            self.add_ordering(replacement, then)?;
        }

        Ok(replacement)
    }
}
