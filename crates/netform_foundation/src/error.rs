//! Error types for netform.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::NodeIndex;

/// Result type alias for netform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for netform operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a node not found error.
    #[must_use]
    pub fn node_not_found(index: NodeIndex) -> Self {
        Self::new(ErrorKind::NodeNotFound(index))
    }

    /// Creates an invalid graph error.
    #[must_use]
    pub fn invalid_graph(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidGraph(message.into()))
    }

    /// Creates a search invariant violation error.
    #[must_use]
    pub fn invariant_violation(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::InvariantViolation { expected, actual })
    }

    /// Creates a rewrite failure error.
    #[must_use]
    pub fn rewrite_failed(match_index: usize, nodes: Vec<NodeIndex>, reason: String) -> Self {
        Self::new(ErrorKind::RewriteFailed {
            match_index,
            nodes,
            reason,
        })
    }

    /// Creates an unknown strategy error.
    #[must_use]
    pub fn unknown_strategy(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownStrategy(name.into()))
    }

    /// Creates an unknown transform error.
    #[must_use]
    pub fn unknown_transform(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownTransform(key.into()))
    }

    /// Creates a duplicate transform registration error.
    #[must_use]
    pub fn duplicate_transform(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateTransform(key.into()))
    }

    /// Creates a search limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: SearchLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Returns true if this error aborts a pass rather than describing bad input.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self.kind {
            ErrorKind::InvariantViolation { .. }
            | ErrorKind::RewriteFailed { .. }
            | ErrorKind::LimitExceeded(_) => true,
            ErrorKind::NodeNotFound(_)
            | ErrorKind::InvalidGraph(_)
            | ErrorKind::UnknownStrategy(_)
            | ErrorKind::UnknownTransform(_)
            | ErrorKind::DuplicateTransform(_)
            | ErrorKind::SerializationError(_)
            | ErrorKind::IoError(_) => false,
        }
    }
}

/// Categorized error kinds.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A recursive search branch returned with the working subgraph resized.
    #[error("subgraph size changed across recursive call: expected {expected}, got {actual}")]
    InvariantViolation {
        /// Size recorded before the call.
        expected: usize,
        /// Size observed after the call.
        actual: usize,
    },

    /// A transform could not rewrite an active match.
    #[error("rewrite failed for match {match_index} {nodes:?}: {reason}")]
    RewriteFailed {
        /// Position of the match in discovery order.
        match_index: usize,
        /// Member nodes of the failing match.
        nodes: Vec<NodeIndex>,
        /// Description supplied by the transform.
        reason: String,
    },

    /// Node index outside the graph.
    #[error("node not found: {0}")]
    NodeNotFound(NodeIndex),

    /// Structural problem with a graph or network description.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Strategy name that does not name a known strategy.
    #[error("unknown match strategy: {0}")]
    UnknownStrategy(String),

    /// Transform key missing from the registry.
    #[error("unknown transform: {0}")]
    UnknownTransform(String),

    /// Transform key registered twice.
    #[error("transform already registered: {0}")]
    DuplicateTransform(String),

    /// Search limit exceeded (kill switch triggered).
    #[error("limit exceeded: {0}")]
    LimitExceeded(SearchLimit),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// I/O failure.
    #[error("io error: {0}")]
    IoError(String),
}

/// Search limits (kill switches) that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchLimit {
    /// Maximum recursive expansions per matching pass exceeded.
    MaxExpansions {
        /// The configured limit.
        limit: usize,
        /// Name of the transform being matched.
        transform: Option<String>,
    },
}

impl fmt::Display for SearchLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxExpansions { limit, transform } => {
                write!(f, "max expansions ({limit}) exceeded")?;
                if let Some(name) = transform {
                    write!(f, " in transform {name}")?;
                }
                Ok(())
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Transform or file the error originated from.
    pub source: Option<String>,
    /// Chain of operations that led to the error.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
