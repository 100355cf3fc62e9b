//! Export of a (possibly rewritten) graph back to a network description.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use netform_foundation::{Error, NetDef, NodeIndex, Result};

use crate::graph::Graph;

impl Graph {
    /// Returns the active nodes in a valid execution order.
    ///
    /// Kahn's algorithm over active blob edges and orderings, always emitting
    /// the lowest ready index first. An unrewritten graph therefore keeps its
    /// original order, and appended replacement nodes land after their
    /// producers but before any operator that overwrites what they read or
    /// write.
    ///
    /// # Errors
    ///
    /// Returns an error if the active nodes contain a cycle.
    pub fn topological_order(&self) -> Result<Vec<NodeIndex>> {
        let mut pending = vec![0usize; self.size()];
        let mut ready: BinaryHeap<Reverse<NodeIndex>> = BinaryHeap::new();

        for index in self.active_nodes() {
            let node = self.node(index)?;
            pending[index] = node
                .parents
                .keys()
                .chain(&node.runs_after)
                .filter(|&&first| self.is_active(first))
                .count();
            if pending[index] == 0 {
                ready.push(Reverse(index));
            }
        }

        let mut order = Vec::with_capacity(self.active_count());
        while let Some(Reverse(index)) = ready.pop() {
            order.push(index);
            let node = self.node(index)?;
            for &then in node.children.keys().chain(&node.runs_before) {
                if !self.is_active(then) {
                    continue;
                }
                pending[then] -= 1;
                if pending[then] == 0 {
                    ready.push(Reverse(then));
                }
            }
        }

        if order.len() != self.active_count() {
            return Err(Error::invalid_graph(format!(
                "cycle among active nodes ({} of {} ordered)",
                order.len(),
                self.active_count()
            )));
        }

        Ok(order)
    }

    /// Exports the active nodes as a [`NetDef`] in topological order.
    ///
    /// # Errors
    ///
    /// Returns an error if the active nodes contain a cycle.
    pub fn to_net(&self) -> Result<NetDef> {
        let ops = self
            .topological_order()?
            .into_iter()
            .map(|index| self.node(index).map(|node| node.op.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(NetDef {
            name: self.name().to_string(),
            ops,
            external_inputs: self.external_inputs().to_vec(),
            external_outputs: self.external_outputs().to_vec(),
        })
    }
}
