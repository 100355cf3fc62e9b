//! Trace event and record types.

use netform_engine::MatchStrategy;
use netform_foundation::NodeIndex;

// =============================================================================
// Trace Event
// =============================================================================

/// Events that can be traced while transforming a network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// A transform pass has started.
    PassStart {
        /// Name of the transform.
        transform: String,
        /// Strategy the matcher used.
        strategy: MatchStrategy,
    },

    /// A transform pass has ended.
    PassEnd {
        /// Name of the transform.
        transform: String,
        /// Number of matches rewritten.
        applied: usize,
        /// Number of stale matches skipped.
        skipped: usize,
        /// Whether the pass completed without error.
        success: bool,
    },

    /// The matcher committed to a match.
    MatchFound {
        /// Position of the match in discovery order.
        index: usize,
        /// Member nodes.
        nodes: Vec<NodeIndex>,
    },

    /// A match was rewritten.
    MatchApplied {
        /// Position of the match in discovery order.
        index: usize,
        /// Member nodes.
        nodes: Vec<NodeIndex>,
    },

    /// A match was skipped because an earlier rewrite consumed one of its nodes.
    MatchSkipped {
        /// Position of the match in discovery order.
        index: usize,
        /// Member nodes.
        nodes: Vec<NodeIndex>,
        /// First member found inactive.
        inactive: NodeIndex,
    },

    /// A rewrite failed and the pass was aborted.
    RewriteFailed {
        /// Position of the match in discovery order.
        index: usize,
        /// Member nodes.
        nodes: Vec<NodeIndex>,
        /// Reason given by the transform.
        reason: String,
    },

    /// Search counters for a pass.
    SearchStats {
        /// Recursive expansions performed.
        expansions: usize,
        /// Candidates offered to `accept`.
        candidates_tried: usize,
        /// Candidates `accept` approved.
        candidates_accepted: usize,
    },

    /// Custom user event.
    Custom {
        /// Event name.
        name: String,
        /// Event data.
        data: String,
    },
}

impl TraceEvent {
    /// Returns a short name for the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PassStart { .. } => "pass-start",
            Self::PassEnd { .. } => "pass-end",
            Self::MatchFound { .. } => "match-found",
            Self::MatchApplied { .. } => "match-applied",
            Self::MatchSkipped { .. } => "match-skipped",
            Self::RewriteFailed { .. } => "rewrite-failed",
            Self::SearchStats { .. } => "search-stats",
            Self::Custom { .. } => "custom",
        }
    }

    /// Returns true if this is a pass boundary event.
    #[must_use]
    pub fn is_pass_boundary(&self) -> bool {
        matches!(self, Self::PassStart { .. } | Self::PassEnd { .. })
    }

    /// Returns true if this event concerns a single match.
    #[must_use]
    pub fn is_match_event(&self) -> bool {
        matches!(
            self,
            Self::MatchFound { .. }
                | Self::MatchApplied { .. }
                | Self::MatchSkipped { .. }
                | Self::RewriteFailed { .. }
        )
    }
}

// =============================================================================
// Trace Record
// =============================================================================

/// A timestamped trace record.
#[derive(Clone, Debug)]
pub struct TraceRecord {
    /// Unique record ID within the tracer.
    pub id: u64,
    /// The pass during which this event occurred.
    pub pass: u64,
    /// Timestamp in nanoseconds since the tracer was created.
    pub timestamp_ns: u64,
    /// The trace event.
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a new trace record.
    #[must_use]
    pub fn new(id: u64, pass: u64, timestamp_ns: u64, event: TraceEvent) -> Self {
        Self {
            id,
            pass,
            timestamp_ns,
            event,
        }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}
