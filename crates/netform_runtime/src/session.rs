//! Session state for transforming one network.
//!
//! The session holds the current network, the transform registry, the
//! transformer configuration, and the tracer. Each applied transform is one
//! pass; a pass that fails leaves the session's network untouched.

use netform_debug::Tracer;
use netform_engine::{MatchStrategy, PassReport, TransformRegistry, Transformer, TransformerConfig};
use netform_foundation::{NetDef, Result};
use netform_graph::Graph;

// =============================================================================
// Pass Summary
// =============================================================================

/// What one pass did to the session's network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassSummary {
    /// Name of the transform.
    pub transform: String,
    /// Strategy the matcher used.
    pub strategy: MatchStrategy,
    /// Matches found.
    pub found: usize,
    /// Matches rewritten.
    pub applied: usize,
    /// Stale matches skipped.
    pub skipped: usize,
    /// Operator count before the pass.
    pub ops_before: usize,
    /// Operator count after the pass.
    pub ops_after: usize,
}

impl PassSummary {
    fn from_report(report: &PassReport, ops_before: usize, ops_after: usize) -> Self {
        Self {
            transform: report.transform.clone(),
            strategy: report.strategy,
            found: report.matches.len(),
            applied: report.apply.applied_count(),
            skipped: report.apply.skipped_count(),
            ops_before,
            ops_after,
        }
    }
}

impl std::fmt::Display for PassSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): {} found, {} applied, {} skipped, {} -> {} ops",
            self.transform,
            self.strategy,
            self.found,
            self.applied,
            self.skipped,
            self.ops_before,
            self.ops_after
        )
    }
}

// =============================================================================
// Session
// =============================================================================

/// Applies registered transforms to a network, one pass at a time.
pub struct Session {
    /// The current network.
    net: NetDef,

    /// Transforms available by key.
    registry: TransformRegistry,

    /// Configuration applied to every pass.
    config: TransformerConfig,

    /// Tracer for observability.
    tracer: Tracer,

    /// Summaries of completed passes, oldest first.
    history: Vec<PassSummary>,
}

impl Session {
    /// Creates a session over `net` with the built-in transforms.
    #[must_use]
    pub fn new(net: NetDef) -> Self {
        Self {
            net,
            registry: TransformRegistry::with_builtins(),
            config: TransformerConfig::default(),
            tracer: Tracer::disabled(),
            history: Vec::new(),
        }
    }

    /// Replaces the transform registry.
    #[must_use]
    pub fn with_registry(mut self, registry: TransformRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the configuration used for every pass.
    #[must_use]
    pub fn with_config(mut self, config: TransformerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the tracer.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Tracer) -> Self {
        self.tracer = tracer;
        self
    }

    /// Returns the current network.
    #[must_use]
    pub fn net(&self) -> &NetDef {
        &self.net
    }

    /// Consumes the session and returns the current network.
    #[must_use]
    pub fn into_net(self) -> NetDef {
        self.net
    }

    /// Returns the transform registry.
    #[must_use]
    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Returns the tracer.
    #[must_use]
    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Returns a mutable reference to the tracer.
    pub fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    /// Returns the summaries of completed passes.
    #[must_use]
    pub fn history(&self) -> &[PassSummary] {
        &self.history
    }

    /// Runs the transform registered under `key` as one pass.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is unknown or the pass fails. On failure
    /// the session's network is unchanged.
    pub fn apply(&mut self, key: &str) -> Result<PassSummary> {
        let transformer =
            Transformer::new(self.registry.create(key)?).with_config(self.config.clone());

        let mut graph = Graph::from_net(&self.net);
        let result = transformer
            .run(&mut graph)
            .and_then(|report| graph.to_net().map(|net| (report, net)));

        match result {
            Ok((report, net)) => {
                self.tracer.record_pass(&report);
                let summary = PassSummary::from_report(&report, self.net.ops.len(), net.ops.len());
                self.net = net;
                self.history.push(summary.clone());
                Ok(summary)
            }
            Err(e) => {
                self.tracer
                    .record_failure(transformer.transform().name(), transformer.strategy(), &e);
                Err(e)
            }
        }
    }

    /// Runs each transform in `keys` in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing pass and returns its error. Passes before
    /// it remain applied.
    pub fn apply_all<I, S>(&mut self, keys: I) -> Result<Vec<PassSummary>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter().map(|key| self.apply(key.as_ref())).collect()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("net", &self.net.name)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}
