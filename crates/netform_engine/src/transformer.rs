//! The transform driver: build, match, apply, export.

use netform_foundation::{ErrorContext, NetDef, Result};
use netform_graph::Graph;

use crate::apply::{ApplyReport, apply_matches};
use crate::pattern::{Match, MatcherConfig, PatternMatcher, SearchStats};
use crate::registry::create_transform;
use crate::strategy::MatchStrategy;
use crate::transform::Transform;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a [`Transformer`].
#[derive(Clone, Debug, Default)]
pub struct TransformerConfig {
    /// Matcher settings.
    pub matcher: MatcherConfig,
}

impl TransformerConfig {
    /// Creates a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to override the transform's strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.matcher.strategy = Some(strategy);
        self
    }

    /// Builder method to cap matcher expansions.
    #[must_use]
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.matcher.max_expansions = Some(limit);
        self
    }
}

// =============================================================================
// Pass Report
// =============================================================================

/// Everything a single transform pass did.
#[derive(Clone, Debug)]
pub struct PassReport {
    /// Name of the transform.
    pub transform: String,
    /// Strategy the matcher used.
    pub strategy: MatchStrategy,
    /// Matches in discovery order.
    pub matches: Vec<Match>,
    /// Matcher counters.
    pub stats: SearchStats,
    /// Outcome of each match.
    pub apply: ApplyReport,
}

// =============================================================================
// Transformer
// =============================================================================

/// Runs one [`Transform`] over networks.
pub struct Transformer {
    transform: Box<dyn Transform>,
    config: TransformerConfig,
}

impl Transformer {
    /// Creates a transformer with default configuration.
    #[must_use]
    pub fn new(transform: Box<dyn Transform>) -> Self {
        Self {
            transform,
            config: TransformerConfig::default(),
        }
    }

    /// Creates a transformer for a built-in transform key.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not registered.
    pub fn from_key(key: &str) -> Result<Self> {
        Ok(Self::new(create_transform(key)?))
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: TransformerConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the transform.
    #[must_use]
    pub fn transform(&self) -> &dyn Transform {
        self.transform.as_ref()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Returns the strategy a pass will use: the configured override, or the
    /// transform's own.
    #[must_use]
    pub fn strategy(&self) -> MatchStrategy {
        self.matcher().strategy_for(self.transform.as_ref())
    }

    fn matcher(&self) -> PatternMatcher {
        PatternMatcher::new(self.config.matcher.clone())
    }

    fn context(&self, frame: &str) -> ErrorContext {
        ErrorContext::new()
            .with_source(self.transform.name())
            .with_frame(frame)
    }

    /// Finds the matches of the transform in `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error if the search aborts.
    pub fn pattern_match(&self, graph: &Graph) -> Result<Vec<Match>> {
        self.matcher()
            .find_matches(graph, self.transform.as_ref())
            .map_err(|e| e.with_context(self.context("pattern_match")))
    }

    /// Applies previously found matches to `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error if a rewrite fails.
    pub fn replace_pattern(&self, matches: &[Match], graph: &mut Graph) -> Result<ApplyReport> {
        apply_matches(self.transform.as_ref(), matches, graph)
    }

    /// Runs one full pass over `graph` in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the search aborts or a rewrite fails. Rewrites
    /// applied before a failure remain in `graph`.
    pub fn run(&self, graph: &mut Graph) -> Result<PassReport> {
        let strategy = self.strategy();
        let (matches, stats) = self
            .matcher()
            .find_matches_with_stats(graph, self.transform.as_ref())
            .map_err(|e| e.with_context(self.context("pattern_match")))?;
        let apply = self.replace_pattern(&matches, graph)?;

        Ok(PassReport {
            transform: self.transform.name().to_string(),
            strategy,
            matches,
            stats,
            apply,
        })
    }

    /// Transforms a network description and returns the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the pass fails or the rewritten graph cannot be
    /// ordered.
    pub fn apply_to(&self, net: &NetDef) -> Result<NetDef> {
        let mut graph = Graph::from_net(net);
        self.run(&mut graph)?;
        graph.to_net()
    }
}

impl std::fmt::Debug for Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformer")
            .field("transform", &self.transform.name())
            .field("config", &self.config)
            .finish()
    }
}
