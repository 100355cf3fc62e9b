//! Greedy backtracking subgraph matching.
//!
//! The matcher scans start nodes in ascending index order. From each start
//! node it grows a working subgraph depth-first, offering candidates to the
//! transform's `accept` predicate according to the [`MatchStrategy`], and
//! remembers the largest subgraph the transform's `validate` predicate
//! approved. That best subgraph becomes a match and its nodes are consumed
//! for the rest of the pass. The decision is never revisited, so the result
//! is greedy rather than globally optimal.

use netform_foundation::{Error, NodeIndex, Result, SearchLimit};
use netform_graph::Graph;

use crate::strategy::MatchStrategy;
use crate::transform::Transform;

// =============================================================================
// Match
// =============================================================================

/// A validated subgraph selected for rewriting.
///
/// Node order is the order in which the search added the nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Match {
    nodes: Vec<NodeIndex>,
}

impl Match {
    /// Creates a match from its member nodes.
    #[must_use]
    pub fn new(nodes: Vec<NodeIndex>) -> Self {
        Self { nodes }
    }

    /// Returns the member nodes in discovery order.
    #[must_use]
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// Returns the number of member nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the match has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if `index` is a member.
    #[must_use]
    pub fn contains(&self, index: NodeIndex) -> bool {
        self.nodes.contains(&index)
    }

    /// Consumes the match, returning its member nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<NodeIndex> {
        self.nodes
    }
}

impl AsRef<[NodeIndex]> for Match {
    fn as_ref(&self) -> &[NodeIndex] {
        &self.nodes
    }
}

impl From<Vec<NodeIndex>> for Match {
    fn from(nodes: Vec<NodeIndex>) -> Self {
        Self::new(nodes)
    }
}

// =============================================================================
// Configuration and Statistics
// =============================================================================

/// Configuration for a [`PatternMatcher`].
#[derive(Clone, Debug, Default)]
pub struct MatcherConfig {
    /// Strategy to use instead of the transform's own.
    pub strategy: Option<MatchStrategy>,
    /// Maximum recursive expansions per pass (kill switch).
    pub max_expansions: Option<usize>,
}

impl MatcherConfig {
    /// Creates a configuration that defers to the transform's strategy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to override the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Builder method to cap the number of expansions.
    #[must_use]
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }
}

/// Counters collected during one matching pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of recursive expansions performed.
    pub expansions: usize,
    /// Number of times `accept` was consulted.
    pub candidates_tried: usize,
    /// Number of times `accept` returned true.
    pub candidates_accepted: usize,
}

// =============================================================================
// Pattern Matcher
// =============================================================================

/// Finds non-overlapping matches of a [`Transform`] in a [`Graph`].
#[derive(Clone, Debug, Default)]
pub struct PatternMatcher {
    config: MatcherConfig,
}

impl PatternMatcher {
    /// Creates a matcher with the given configuration.
    #[must_use]
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Returns the strategy that will be used for `transform`.
    #[must_use]
    pub fn strategy_for<T: Transform + ?Sized>(&self, transform: &T) -> MatchStrategy {
        self.config.strategy.unwrap_or_else(|| transform.strategy())
    }

    /// Finds matches of `transform` in `graph`, in discovery order.
    ///
    /// No two returned matches share a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the search invariant is violated or the expansion
    /// limit is exceeded.
    pub fn find_matches<T: Transform + ?Sized>(
        &self,
        graph: &Graph,
        transform: &T,
    ) -> Result<Vec<Match>> {
        self.find_matches_with_stats(graph, transform)
            .map(|(matches, _)| matches)
    }

    /// Like [`find_matches`](Self::find_matches), also returning search counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the search invariant is violated or the expansion
    /// limit is exceeded.
    pub fn find_matches_with_stats<T: Transform + ?Sized>(
        &self,
        graph: &Graph,
        transform: &T,
    ) -> Result<(Vec<Match>, SearchStats)> {
        let mut search = Search::new(
            graph,
            transform,
            self.strategy_for(transform),
            self.config.max_expansions,
        );
        let mut matches = Vec::new();

        for start in 0..graph.size() {
            search.best.clear();

            if !search.matched[start] && search.offer(start) {
                search.subgraph.push(start);
                let result = search.expand();
                search.subgraph.pop();
                result?;
            }

            if !search.best.is_empty() {
                let nodes = std::mem::take(&mut search.best);
                for &index in &nodes {
                    search.matched[index] = true;
                }
                matches.push(Match::new(nodes));
            }
        }

        Ok((matches, search.stats))
    }
}

// =============================================================================
// Search State
// =============================================================================

/// Working state owned by a single matching pass.
struct Search<'a, T: Transform + ?Sized> {
    graph: &'a Graph,
    transform: &'a T,
    strategy: MatchStrategy,
    max_expansions: Option<usize>,
    /// Nodes consumed by an earlier match in this pass.
    matched: Vec<bool>,
    /// Subgraph currently being grown.
    subgraph: Vec<NodeIndex>,
    /// Largest validated subgraph seen from the current start node.
    best: Vec<NodeIndex>,
    stats: SearchStats,
}

impl<'a, T: Transform + ?Sized> Search<'a, T> {
    fn new(
        graph: &'a Graph,
        transform: &'a T,
        strategy: MatchStrategy,
        max_expansions: Option<usize>,
    ) -> Self {
        Self {
            graph,
            transform,
            strategy,
            max_expansions,
            matched: vec![false; graph.size()],
            subgraph: Vec::new(),
            best: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Asks the transform whether `candidate` may extend the subgraph.
    fn offer(&mut self, candidate: NodeIndex) -> bool {
        self.stats.candidates_tried += 1;
        let accepted = self
            .transform
            .accept(self.graph, &self.subgraph, candidate);
        if accepted {
            self.stats.candidates_accepted += 1;
        }
        accepted
    }

    /// Records the current subgraph if it is valid and larger than the best,
    /// then recurses into every extension the strategy allows.
    fn expand(&mut self) -> Result<()> {
        self.stats.expansions += 1;
        if let Some(limit) = self.max_expansions {
            if self.stats.expansions > limit {
                return Err(Error::limit_exceeded(SearchLimit::MaxExpansions {
                    limit,
                    transform: Some(self.transform.name().to_string()),
                }));
            }
        }

        // Strict: the first subgraph found at a given size wins ties.
        if self.transform.validate(self.graph, &self.subgraph)
            && self.subgraph.len() > self.best.len()
        {
            self.best.clone_from(&self.subgraph);
        }

        let size_before = self.subgraph.len();
        let graph = self.graph;

        match self.strategy {
            MatchStrategy::Connected => {
                for position in 0..size_before {
                    let node = graph.node(self.subgraph[position])?;
                    for &child in node.children.keys() {
                        self.try_neighbor(child)?;
                    }
                    self.ensure_restored(size_before)?;
                    for &parent in node.parents.keys() {
                        self.try_neighbor(parent)?;
                    }
                    self.ensure_restored(size_before)?;
                }
            }
            MatchStrategy::OrderedByPosition => {
                let first = self.subgraph.last().map_or(0, |&last| last + 1);
                for candidate in first..graph.size() {
                    if !self.matched[candidate] {
                        self.try_candidate(candidate)?;
                        self.ensure_restored(size_before)?;
                    }
                }
            }
            MatchStrategy::Unrestricted => {
                for candidate in 0..graph.size() {
                    if !self.subgraph.contains(&candidate) && !self.matched[candidate] {
                        self.try_candidate(candidate)?;
                        self.ensure_restored(size_before)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn try_neighbor(&mut self, neighbor: NodeIndex) -> Result<()> {
        if self.subgraph.contains(&neighbor) || self.matched[neighbor] {
            return Ok(());
        }
        self.try_candidate(neighbor)
    }

    /// Appends `candidate` if accepted, recurses, and removes it again.
    fn try_candidate(&mut self, candidate: NodeIndex) -> Result<()> {
        if !self.offer(candidate) {
            return Ok(());
        }
        self.subgraph.push(candidate);
        let result = self.expand();
        self.subgraph.pop();
        result
    }

    fn ensure_restored(&self, size_before: usize) -> Result<()> {
        if self.subgraph.len() == size_before {
            Ok(())
        } else {
            Err(Error::invariant_violation(size_before, self.subgraph.len()))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
