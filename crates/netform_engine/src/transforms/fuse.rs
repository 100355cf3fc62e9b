//! Fusion of operator chains.
//!
//! A [`FuseSequence`] collapses a chain of operators with the given types,
//! each reading an output of the one before it, into one fused operator.

use netform_foundation::{Error, NodeIndex, OperatorDef, Result};
use netform_graph::Graph;

use crate::strategy::MatchStrategy;
use crate::transform::Transform;

/// Replaces a chain `A -> B -> ...` of fixed operator types with one op.
///
/// Intermediate blobs must be private to the chain: read by no operator
/// outside it and not listed as external outputs. The fused operator reads
/// the chain's boundary inputs, writes the last operator's outputs, and
/// carries the union of the chain's arguments (later operators win).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuseSequence {
    name: String,
    pattern: Vec<String>,
    fused_type: String,
}

impl FuseSequence {
    /// Creates a fusion of `pattern` into `fused_type`.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, pattern: I, fused_type: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            pattern: pattern.into_iter().map(Into::into).collect(),
            fused_type: fused_type.into(),
        }
    }

    /// Returns the operator types matched, in chain order.
    #[must_use]
    pub fn pattern(&self) -> &[String] {
        &self.pattern
    }

    /// Returns the type of the fused operator.
    #[must_use]
    pub fn fused_type(&self) -> &str {
        &self.fused_type
    }

    /// True if nothing outside `chain` can observe the outputs of `index`.
    fn is_private(graph: &Graph, index: NodeIndex, chain: &[NodeIndex]) -> bool {
        graph.node(index).is_ok_and(|node| {
            node.children
                .keys()
                .all(|child| chain.contains(child) || !graph.is_active(*child))
                && !node
                    .op
                    .outputs
                    .iter()
                    .any(|blob| graph.external_outputs().contains(blob))
        })
    }
}

impl Transform for FuseSequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::OrderedByPosition
    }

    fn accept(&self, graph: &Graph, subgraph: &[NodeIndex], candidate: NodeIndex) -> bool {
        let Some(expected) = self.pattern.get(subgraph.len()) else {
            return false;
        };
        let Ok(node) = graph.node(candidate) else {
            return false;
        };
        if node.op_type() != expected {
            return false;
        }
        subgraph
            .last()
            .is_none_or(|previous| node.parents.contains_key(previous))
    }

    fn validate(&self, graph: &Graph, subgraph: &[NodeIndex]) -> bool {
        if subgraph.len() != self.pattern.len() {
            return false;
        }
        let Some((_, intermediates)) = subgraph.split_last() else {
            return false;
        };
        intermediates
            .iter()
            .all(|&index| Self::is_private(graph, index, subgraph))
    }

    fn rewrite(&self, matched: &[NodeIndex], graph: &mut Graph) -> Result<()> {
        if matched.len() != self.pattern.len() {
            return Err(Error::invalid_graph(format!(
                "{}: expected {} nodes, got {}",
                self.name,
                self.pattern.len(),
                matched.len()
            )));
        }

        let mut fused = OperatorDef::new(self.fused_type.clone());
        let mut names = Vec::new();
        for (&index, expected) in matched.iter().zip(&self.pattern) {
            let op = &graph.node(index)?.op;
            if &op.op_type != expected {
                return Err(Error::invalid_graph(format!(
                    "{}: node {index} is {}, expected {expected}",
                    self.name, op.op_type
                )));
            }
            if !op.name.is_empty() {
                names.push(op.name.clone());
            }
            fused
                .args
                .extend(op.args.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let Some(&last) = matched.last() else {
            return Err(Error::invalid_graph(format!("{}: empty match", self.name)));
        };
        fused.name = names.join("+");
        fused.inputs = graph.subgraph_inputs(matched)?;
        fused.outputs.clone_from(&graph.node(last)?.op.outputs);

        graph.replace_subgraph(matched, fused)?;
        Ok(())
    }
}
