//! Applying matches to a graph.
//!
//! Matches are found against the graph as it was before any rewrite, so an
//! earlier rewrite can leave a later match stale. A match is only handed to
//! the transform if every member node is still active; otherwise it is
//! skipped whole.

use netform_foundation::{Error, ErrorContext, NodeIndex, Result};
use netform_graph::Graph;

use crate::pattern::Match;
use crate::transform::Transform;

// =============================================================================
// Apply Report
// =============================================================================

/// What happened to one match during the apply phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The transform rewrote the match.
    Applied {
        /// Member nodes of the match.
        nodes: Vec<NodeIndex>,
    },
    /// A member had already been replaced; the match was left alone.
    Skipped {
        /// Member nodes of the match.
        nodes: Vec<NodeIndex>,
        /// First member found inactive.
        inactive: NodeIndex,
    },
}

impl MatchOutcome {
    /// Returns the member nodes of the match.
    #[must_use]
    pub fn nodes(&self) -> &[NodeIndex] {
        match self {
            Self::Applied { nodes } | Self::Skipped { nodes, .. } => nodes,
        }
    }

    /// Returns true if the match was rewritten.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Per-match outcomes of an apply phase, in match order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// One outcome per match attempted.
    pub outcomes: Vec<MatchOutcome>,
}

impl ApplyReport {
    /// Number of matches rewritten.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    /// Number of matches skipped as stale.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.applied_count()
    }
}

// =============================================================================
// Apply
// =============================================================================

/// Rewrites each match in order, skipping stale ones.
///
/// A rewrite failure stops the phase immediately. Matches rewritten before
/// the failure stay rewritten; the failing match and all later ones are not
/// attempted.
///
/// # Errors
///
/// Returns [`ErrorKind::RewriteFailed`](netform_foundation::ErrorKind::RewriteFailed)
/// if the transform rejects an active match.
pub fn apply_matches<T: Transform + ?Sized>(
    transform: &T,
    matches: &[Match],
    graph: &mut Graph,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();

    for (match_index, matched) in matches.iter().enumerate() {
        let nodes = matched.nodes();

        if let Some(&inactive) = nodes.iter().find(|&&index| !graph.is_active(index)) {
            report.outcomes.push(MatchOutcome::Skipped {
                nodes: nodes.to_vec(),
                inactive,
            });
            continue;
        }

        transform.rewrite(nodes, graph).map_err(|source| {
            Error::rewrite_failed(match_index, nodes.to_vec(), source.to_string()).with_context(
                ErrorContext::new()
                    .with_source(transform.name())
                    .with_frame("apply_matches"),
            )
        })?;

        report.outcomes.push(MatchOutcome::Applied {
            nodes: nodes.to_vec(),
        });
    }

    Ok(report)
}

// =============================================================================
// Tests
// =============================================================================
