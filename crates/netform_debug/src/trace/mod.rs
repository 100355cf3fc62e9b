//! Tracing system for netform.
//!
//! Records what each transform pass found and did, with zero overhead when
//! disabled. Supports both human-readable and JSON output formats.
//!
//! # Example
//!
//! ```
//! use netform_debug::{Tracer, TracerConfig};
//! use netform_engine::Transformer;
//! use netform_foundation::{NetDef, OperatorDef};
//! use netform_graph::Graph;
//!
//! let net = NetDef::new("n")
//!     .with_op(OperatorDef::new("Conv").with_inputs(["X"]).with_outputs(["C"]))
//!     .with_op(OperatorDef::new("Relu").with_inputs(["C"]).with_outputs(["R"]));
//! let mut graph = Graph::from_net(&net);
//!
//! let mut tracer = Tracer::new(TracerConfig::new().enabled());
//! let report = Transformer::from_key("fuse_conv_relu")?.run(&mut graph)?;
//! tracer.record_pass(&report);
//!
//! assert_eq!(tracer.buffer().by_event_type("match-applied").len(), 1);
//! # Ok::<(), netform_foundation::Error>(())
//! ```

pub mod buffer;
pub mod format;
pub mod record;

pub use buffer::{TraceBuffer, TraceBufferStats};
pub use format::{HumanFormatter, JsonFormatter, TraceFormatter};
pub use record::{TraceEvent, TraceRecord};

use std::io::{self, Write};
use std::time::Instant;

use netform_engine::{MatchOutcome, MatchStrategy, PassReport};
use netform_foundation::{Error, ErrorKind, NodeIndex};

// =============================================================================
// Trace Output
// =============================================================================

/// Where trace output should be sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TraceOutput {
    /// No output (traces still recorded in buffer).
    #[default]
    None,
    /// Write to stderr as events are recorded.
    Stderr,
}

// =============================================================================
// Tracer Configuration
// =============================================================================

/// Configuration for the tracer.
#[derive(Clone, Debug)]
pub struct TracerConfig {
    /// Whether tracing is enabled.
    pub enabled: bool,
    /// Maximum records to keep in buffer.
    pub buffer_size: usize,
    /// Where to output traces.
    pub output: TraceOutput,
    /// Whether to use JSON format.
    pub json_format: bool,
    /// Filter for specific event types (empty = all).
    pub event_filter: Vec<String>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            buffer_size: 10000,
            output: TraceOutput::None,
            json_format: false,
            event_filter: Vec::new(),
        }
    }
}

impl TracerConfig {
    /// Creates a new tracer configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to enable tracing.
    #[must_use]
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    /// Builder method to set buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Builder method to output to stderr.
    #[must_use]
    pub fn to_stderr(mut self) -> Self {
        self.output = TraceOutput::Stderr;
        self
    }

    /// Builder method to use JSON format.
    #[must_use]
    pub fn json(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Builder method to filter event types.
    #[must_use]
    pub fn filter_events(mut self, types: Vec<String>) -> Self {
        self.event_filter = types;
        self
    }
}

// =============================================================================
// Tracer
// =============================================================================

/// Records transform pass events.
///
/// The `record` method returns immediately when tracing is off. Each
/// [`pass_start`](Self::pass_start) opens a new pass number; events recorded
/// afterwards belong to that pass.
pub struct Tracer {
    config: TracerConfig,
    buffer: TraceBuffer,
    current_pass: u64,
    start_time: Instant,
    human_formatter: HumanFormatter,
    json_formatter: JsonFormatter,
}

impl Tracer {
    /// Creates a new tracer with the given configuration.
    #[must_use]
    pub fn new(config: TracerConfig) -> Self {
        let buffer_size = config.buffer_size;
        Self {
            config,
            buffer: TraceBuffer::new(buffer_size),
            current_pass: 0,
            start_time: Instant::now(),
            human_formatter: HumanFormatter::new().with_timestamps(),
            json_formatter: JsonFormatter::new(),
        }
    }

    /// Creates a tracer with default configuration (disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(TracerConfig::default())
    }

    /// Creates an enabled tracer that outputs to stderr.
    #[must_use]
    pub fn to_stderr() -> Self {
        Self::new(TracerConfig::new().enabled().to_stderr())
    }

    /// Returns whether tracing is enabled.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Enables tracing.
    pub fn enable(&mut self) {
        self.config.enabled = true;
    }

    /// Disables tracing.
    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    /// Returns the current pass number (0 before the first pass).
    #[must_use]
    pub fn current_pass(&self) -> u64 {
        self.current_pass
    }

    /// Sets whether to use JSON output format.
    pub fn set_json_format(&mut self, json: bool) {
        self.config.json_format = json;
    }

    /// Sets the trace output destination.
    pub fn set_output(&mut self, output: TraceOutput) {
        self.config.output = output;
    }

    /// Records a trace event.
    #[inline]
    pub fn record(&mut self, event: TraceEvent) {
        if !self.config.enabled {
            return;
        }

        self.record_internal(event);
    }

    fn record_internal(&mut self, event: TraceEvent) {
        if !self.config.event_filter.is_empty()
            && !self
                .config
                .event_filter
                .iter()
                .any(|t| t == event.event_type())
        {
            return;
        }

        #[allow(clippy::cast_possible_truncation)]
        let timestamp_ns = self.start_time.elapsed().as_nanos() as u64;
        self.buffer.push(self.current_pass, timestamp_ns, event);

        if self.config.output == TraceOutput::Stderr {
            if let Some(record) = self.buffer.last() {
                let line = self.format_record(record);
                let _ = writeln!(io::stderr(), "{line}");
            }
        }
    }

    /// Formats a record using the current format settings.
    #[must_use]
    pub fn format_record(&self, record: &TraceRecord) -> String {
        if self.config.json_format {
            self.json_formatter.format(record)
        } else {
            self.human_formatter.format(record)
        }
    }

    /// Formats multiple records.
    #[must_use]
    pub fn format_records(&self, records: &[&TraceRecord]) -> String {
        if self.config.json_format {
            self.json_formatter.format_many(records)
        } else {
            self.human_formatter.format_many(records)
        }
    }

    /// Returns the trace buffer.
    #[must_use]
    pub fn buffer(&self) -> &TraceBuffer {
        &self.buffer
    }

    /// Clears the trace buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Returns buffer statistics.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        self.buffer.stats()
    }

    // -------------------------------------------------------------------------
    // Pass reports
    // -------------------------------------------------------------------------

    /// Records a completed pass as a sequence of events.
    ///
    /// Emits the pass start, every match found, the search counters, the
    /// outcome of each match, and the pass end.
    pub fn record_pass(&mut self, report: &PassReport) {
        if !self.config.enabled {
            return;
        }

        self.pass_start(&report.transform, report.strategy);
        for (index, m) in report.matches.iter().enumerate() {
            self.match_found(index, m.nodes().to_vec());
        }
        self.search_stats(
            report.stats.expansions,
            report.stats.candidates_tried,
            report.stats.candidates_accepted,
        );
        for (index, outcome) in report.apply.outcomes.iter().enumerate() {
            match outcome {
                MatchOutcome::Applied { nodes } => self.match_applied(index, nodes.clone()),
                MatchOutcome::Skipped { nodes, inactive } => {
                    self.match_skipped(index, nodes.clone(), *inactive);
                }
            }
        }
        self.pass_end(
            &report.transform,
            report.apply.applied_count(),
            report.apply.skipped_count(),
            true,
        );
    }

    /// Records a pass that aborted with `error`.
    ///
    /// A failed rewrite is recorded with its match; any other error is
    /// recorded as a custom `error` event. Counts in the pass end are zero
    /// because the aborted pass does not report them.
    pub fn record_failure(&mut self, transform: &str, strategy: MatchStrategy, error: &Error) {
        if !self.config.enabled {
            return;
        }

        self.pass_start(transform, strategy);
        match &error.kind {
            ErrorKind::RewriteFailed {
                match_index,
                nodes,
                reason,
            } => self.rewrite_failed(*match_index, nodes.clone(), reason.clone()),
            other => self.custom("error", other.to_string()),
        }
        self.pass_end(transform, 0, 0, false);
    }

    // -------------------------------------------------------------------------
    // Convenience methods for common events
    // -------------------------------------------------------------------------

    /// Opens a new pass and records its start.
    #[inline]
    pub fn pass_start(&mut self, transform: &str, strategy: MatchStrategy) {
        self.current_pass += 1;
        self.record(TraceEvent::PassStart {
            transform: transform.to_string(),
            strategy,
        });
    }

    /// Records a pass end event.
    #[inline]
    pub fn pass_end(&mut self, transform: &str, applied: usize, skipped: usize, success: bool) {
        self.record(TraceEvent::PassEnd {
            transform: transform.to_string(),
            applied,
            skipped,
            success,
        });
    }

    /// Records a match found event.
    #[inline]
    pub fn match_found(&mut self, index: usize, nodes: Vec<NodeIndex>) {
        self.record(TraceEvent::MatchFound { index, nodes });
    }

    /// Records a match applied event.
    #[inline]
    pub fn match_applied(&mut self, index: usize, nodes: Vec<NodeIndex>) {
        self.record(TraceEvent::MatchApplied { index, nodes });
    }

    /// Records a match skipped event.
    #[inline]
    pub fn match_skipped(&mut self, index: usize, nodes: Vec<NodeIndex>, inactive: NodeIndex) {
        self.record(TraceEvent::MatchSkipped {
            index,
            nodes,
            inactive,
        });
    }

    /// Records a rewrite failure event.
    #[inline]
    pub fn rewrite_failed(&mut self, index: usize, nodes: Vec<NodeIndex>, reason: String) {
        self.record(TraceEvent::RewriteFailed {
            index,
            nodes,
            reason,
        });
    }

    /// Records search counters.
    #[inline]
    pub fn search_stats(
        &mut self,
        expansions: usize,
        candidates_tried: usize,
        candidates_accepted: usize,
    ) {
        self.record(TraceEvent::SearchStats {
            expansions,
            candidates_tried,
            candidates_accepted,
        });
    }

    /// Records a custom event.
    #[inline]
    pub fn custom(&mut self, name: impl Into<String>, data: impl Into<String>) {
        self.record(TraceEvent::Custom {
            name: name.into(),
            data: data.into(),
        });
    }
}

impl Default for Tracer {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("config", &self.config)
            .field("current_pass", &self.current_pass)
            .field("records", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
