//! The operator graph.
//!
//! Nodes are stored densely by index. Edges are kept in both directions:
//! `children` of the producer and `parents` of the consumer, each labelled
//! with the blob names flowing along the edge.

use std::collections::HashMap;

use netform_foundation::{Error, NetDef, NodeIndex, OperatorDef, Result};

use crate::node::Node;

// =============================================================================
// Graph
// =============================================================================

/// Directed graph of operator nodes built from a [`NetDef`].
#[derive(Clone, Debug, Default)]
pub struct Graph {
    name: String,
    nodes: Vec<Node>,
    pub(crate) external_inputs: Vec<String>,
    pub(crate) external_outputs: Vec<String>,
}

impl Graph {
    /// Creates an empty graph with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds a graph from a network description.
    ///
    /// Each input blob of an operator is linked to the most recent earlier
    /// operator that wrote it. Blobs with no earlier writer get no edge.
    ///
    /// An operator that overwrites a blob is also ordered after the previous
    /// writer of that blob and after every operator that read the previous
    /// value. These orderings carry no blob and are only used on export.
    #[must_use]
    pub fn from_net(net: &NetDef) -> Self {
        let mut graph = Self {
            name: net.name.clone(),
            nodes: net.ops.iter().cloned().map(Node::new).collect(),
            external_inputs: net.external_inputs.clone(),
            external_outputs: net.external_outputs.clone(),
        };

        let mut last_writer: HashMap<&str, NodeIndex> = HashMap::new();
        let mut readers: HashMap<&str, Vec<NodeIndex>> = HashMap::new();
        for (index, op) in net.ops.iter().enumerate() {
            for blob in &op.inputs {
                if let Some(&writer) = last_writer.get(blob.as_str()) {
                    graph.link(writer, index, blob);
                }
                readers.entry(blob.as_str()).or_default().push(index);
            }
            for blob in &op.outputs {
                let previous = last_writer.get(blob.as_str()).copied();
                if let Some(writer) = previous.filter(|&writer| writer != index) {
                    graph.sequence(writer, index);
                }
                for reader in readers.remove(blob.as_str()).unwrap_or_default() {
                    if reader != index {
                        graph.sequence(reader, index);
                    }
                }
                last_writer.insert(blob.as_str(), index);
            }
        }

        graph
    }

    /// Returns the network name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of nodes, active or not.
    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn node(&self, index: NodeIndex) -> Result<&Node> {
        self.nodes
            .get(index)
            .ok_or_else(|| Error::node_not_found(index))
    }

    /// Returns the node at `index` for mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn node_mut(&mut self, index: NodeIndex) -> Result<&mut Node> {
        self.nodes
            .get_mut(index)
            .ok_or_else(|| Error::node_not_found(index))
    }

    /// Returns true if `index` names an active node.
    #[must_use]
    #[inline]
    pub fn is_active(&self, index: NodeIndex) -> bool {
        self.nodes.get(index).is_some_and(Node::is_active)
    }

    /// Iterates over all nodes with their indices.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes.iter().enumerate()
    }

    /// Iterates over the indices of active nodes in ascending order.
    pub fn active_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.active)
            .map(|(index, _)| index)
    }

    /// Returns the number of active nodes.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.active).count()
    }

    /// Returns the blobs supplied from outside the network.
    #[must_use]
    pub fn external_inputs(&self) -> &[String] {
        &self.external_inputs
    }

    /// Returns the blobs the network must produce.
    #[must_use]
    pub fn external_outputs(&self) -> &[String] {
        &self.external_outputs
    }

    // -------------------------------------------------------------------------
    // Mutation hooks
    // -------------------------------------------------------------------------

    /// Marks a node as replaced. Its edges are kept but ignored on export.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn deactivate(&mut self, index: NodeIndex) -> Result<()> {
        self.node_mut(index)?.active = false;
        Ok(())
    }

    /// Deactivates every node in `indices`.
    ///
    /// Indices are checked up front, so either all nodes are deactivated or
    /// none are.
    ///
    /// # Errors
    ///
    /// Returns an error if any index is out of range.
    pub fn deactivate_all(&mut self, indices: &[NodeIndex]) -> Result<()> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.nodes.len()) {
            return Err(Error::node_not_found(bad));
        }
        for &index in indices {
            self.nodes[index].active = false;
        }
        Ok(())
    }

    /// Appends a new active node with no edges and returns its index.
    pub fn push_node(&mut self, op: OperatorDef) -> NodeIndex {
        self.nodes.push(Node::new(op));
        self.nodes.len() - 1
    }

    /// Adds an edge from `from` to `to` carrying `blob`.
    ///
    /// Adding an existing labelled edge is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if either index is out of range or `from == to`.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, blob: &str) -> Result<()> {
        self.node(from)?;
        self.node(to)?;
        if from == to {
            return Err(Error::invalid_graph(format!(
                "self edge on node {from} via {blob}"
            )));
        }
        self.link(from, to, blob);
        Ok(())
    }

    /// Removes every edge from `from` to `to`.
    ///
    /// Returns true if an edge was present.
    ///
    /// # Errors
    ///
    /// Returns an error if either index is out of range.
    pub fn remove_edge(&mut self, from: NodeIndex, to: NodeIndex) -> Result<bool> {
        self.node(from)?;
        self.node(to)?;
        let had_child = self.nodes[from].children.remove(&to).is_some();
        let had_parent = self.nodes[to].parents.remove(&from).is_some();
        Ok(had_child || had_parent)
    }

    /// Requires `first` to be exported before `then` without a blob edge.
    ///
    /// # Errors
    ///
    /// Returns an error if either index is out of range or `first == then`.
    pub fn add_ordering(&mut self, first: NodeIndex, then: NodeIndex) -> Result<()> {
        self.node(first)?;
        self.node(then)?;
        if first == then {
            return Err(Error::invalid_graph(format!(
                "node {first} ordered after itself"
            )));
        }
        self.sequence(first, then);
        Ok(())
    }

    fn sequence(&mut self, first: NodeIndex, then: NodeIndex) {
        self.nodes[first].runs_before.insert(then);
        self.nodes[then].runs_after.insert(first);
    }

    fn link(&mut self, from: NodeIndex, to: NodeIndex, blob: &str) {
        self.nodes[from]
            .children
            .entry(to)
            .or_default()
            .insert(blob.to_string());
        self.nodes[to]
            .parents
            .entry(from)
            .or_default()
            .insert(blob.to_string());
    }
}

impl From<&NetDef> for Graph {
    fn from(net: &NetDef) -> Self {
        Self::from_net(net)
    }
}

// =============================================================================
// Tests
// =============================================================================
