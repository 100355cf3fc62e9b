//! The rewrite rule capability.

use netform_foundation::{NodeIndex, Result};
use netform_graph::Graph;

use crate::strategy::MatchStrategy;

/// A graph rewrite: what to match and how to replace it.
///
/// The matcher only ever calls [`accept`](Self::accept) and
/// [`validate`](Self::validate), both through `&self` with a shared graph.
/// Returning `false` from either is ordinary control flow. Only
/// [`rewrite`](Self::rewrite) may mutate the graph.
pub trait Transform {
    /// Short identifier used in reports and traces.
    fn name(&self) -> &str;

    /// Strategy the matcher should use for this transform.
    fn strategy(&self) -> MatchStrategy {
        MatchStrategy::Connected
    }

    /// May `candidate` be appended to `subgraph` right now?
    ///
    /// Called with an empty `subgraph` to decide whether a search may start
    /// at `candidate`.
    fn accept(&self, graph: &Graph, subgraph: &[NodeIndex], candidate: NodeIndex) -> bool;

    /// Is `subgraph` an acceptable complete match?
    ///
    /// Called on every partial subgraph the search reaches, not only on
    /// leaves; the largest validated subgraph per start node wins.
    fn validate(&self, graph: &Graph, subgraph: &[NodeIndex]) -> bool;

    /// Replaces `matched` in `graph`.
    ///
    /// Only called when every node of `matched` is still active.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph is not in the shape the transform
    /// expects. This aborts the remaining apply phase.
    fn rewrite(&self, matched: &[NodeIndex], graph: &mut Graph) -> Result<()>;
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn strategy(&self) -> MatchStrategy {
        (**self).strategy()
    }

    fn accept(&self, graph: &Graph, subgraph: &[NodeIndex], candidate: NodeIndex) -> bool {
        (**self).accept(graph, subgraph, candidate)
    }

    fn validate(&self, graph: &Graph, subgraph: &[NodeIndex]) -> bool {
        (**self).validate(graph, subgraph)
    }

    fn rewrite(&self, matched: &[NodeIndex], graph: &mut Graph) -> Result<()> {
        (**self).rewrite(matched, graph)
    }
}
