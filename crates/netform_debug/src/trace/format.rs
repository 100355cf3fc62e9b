//! Trace output formatters.
//!
//! Provides human-readable and JSON formatters for trace records.

use netform_foundation::NodeIndex;

use super::record::{TraceEvent, TraceRecord};

// =============================================================================
// Trace Formatter Trait
// =============================================================================

/// Trait for formatting trace records.
pub trait TraceFormatter {
    /// Formats a single trace record to a string.
    fn format(&self, record: &TraceRecord) -> String;

    /// Formats multiple records.
    fn format_many(&self, records: &[&TraceRecord]) -> String {
        records
            .iter()
            .map(|r| self.format(r))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn join_nodes(nodes: &[NodeIndex], separator: &str) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

// =============================================================================
// Human-Readable Formatter
// =============================================================================

/// Formats trace records in human-readable form.
#[derive(Clone, Debug, Default)]
pub struct HumanFormatter {
    /// Whether to include timestamps.
    pub show_timestamps: bool,
    /// Whether to include record IDs.
    pub show_ids: bool,
}

impl HumanFormatter {
    /// Creates a new human formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to show timestamps.
    #[must_use]
    pub fn with_timestamps(mut self) -> Self {
        self.show_timestamps = true;
        self
    }

    /// Builder method to show record IDs.
    #[must_use]
    pub fn with_ids(mut self) -> Self {
        self.show_ids = true;
        self
    }

    /// Formats timestamp in microseconds.
    #[allow(clippy::cast_precision_loss)]
    fn format_timestamp(ns: u64) -> String {
        let us = ns / 1000;
        if us >= 1_000_000 {
            format!("{:.3}s", us as f64 / 1_000_000.0)
        } else if us >= 1000 {
            format!("{:.3}ms", us as f64 / 1000.0)
        } else {
            format!("{us}us")
        }
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        use std::fmt::Write;
        let mut prefix = String::new();

        if self.show_ids {
            let _ = write!(prefix, "[{:06}] ", record.id);
        }

        let _ = write!(prefix, "P{:03} ", record.pass);

        if self.show_timestamps {
            let _ = write!(
                prefix,
                "{:>10} ",
                Self::format_timestamp(record.timestamp_ns)
            );
        }

        let event_str = match &record.event {
            TraceEvent::PassStart {
                transform,
                strategy,
            } => {
                format!("=== PASS {transform} ({strategy}) START ===")
            }
            TraceEvent::PassEnd {
                transform,
                applied,
                skipped,
                success,
            } => {
                let status = if *success { "OK" } else { "FAILED" };
                format!(
                    "=== PASS {transform} END ({status}, {applied} applied, {skipped} skipped) ==="
                )
            }
            TraceEvent::MatchFound { index, nodes } => {
                format!("  FOUND #{index} [{}]", join_nodes(nodes, ", "))
            }
            TraceEvent::MatchApplied { index, nodes } => {
                format!("  APPLIED #{index} [{}]", join_nodes(nodes, ", "))
            }
            TraceEvent::MatchSkipped {
                index,
                nodes,
                inactive,
            } => {
                format!(
                    "  SKIPPED #{index} [{}] (node {inactive} inactive)",
                    join_nodes(nodes, ", ")
                )
            }
            TraceEvent::RewriteFailed {
                index,
                nodes,
                reason,
            } => {
                format!(
                    "  FAILED #{index} [{}]: {reason}",
                    join_nodes(nodes, ", ")
                )
            }
            TraceEvent::SearchStats {
                expansions,
                candidates_tried,
                candidates_accepted,
            } => {
                format!(
                    "  SEARCH {expansions} expansions, {candidates_accepted}/{candidates_tried} candidates accepted"
                )
            }
            TraceEvent::Custom { name, data } => {
                format!("  CUSTOM {name}: {data}")
            }
        };

        format!("{prefix}{event_str}")
    }
}

// =============================================================================
// JSON Formatter
// =============================================================================

/// Formats trace records as JSON.
#[derive(Clone, Debug, Default)]
pub struct JsonFormatter {
    /// Whether to pretty-print JSON.
    pub pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for pretty printing.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Escapes a string for JSON.
    fn escape_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    fn format_nodes(nodes: &[NodeIndex]) -> String {
        format!("[{}]", join_nodes(nodes, ","))
    }
}

impl TraceFormatter for JsonFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let event_data = match &record.event {
            TraceEvent::PassStart {
                transform,
                strategy,
            } => {
                format!(
                    "\"transform\":\"{}\",\"strategy\":\"{strategy}\"",
                    Self::escape_string(transform)
                )
            }
            TraceEvent::PassEnd {
                transform,
                applied,
                skipped,
                success,
            } => {
                format!(
                    "\"transform\":\"{}\",\"applied\":{applied},\"skipped\":{skipped},\"success\":{success}",
                    Self::escape_string(transform)
                )
            }
            TraceEvent::MatchFound { index, nodes } | TraceEvent::MatchApplied { index, nodes } => {
                format!("\"index\":{index},\"nodes\":{}", Self::format_nodes(nodes))
            }
            TraceEvent::MatchSkipped {
                index,
                nodes,
                inactive,
            } => {
                format!(
                    "\"index\":{index},\"nodes\":{},\"inactive\":{inactive}",
                    Self::format_nodes(nodes)
                )
            }
            TraceEvent::RewriteFailed {
                index,
                nodes,
                reason,
            } => {
                format!(
                    "\"index\":{index},\"nodes\":{},\"reason\":\"{}\"",
                    Self::format_nodes(nodes),
                    Self::escape_string(reason)
                )
            }
            TraceEvent::SearchStats {
                expansions,
                candidates_tried,
                candidates_accepted,
            } => {
                format!(
                    "\"expansions\":{expansions},\"candidates_tried\":{candidates_tried},\"candidates_accepted\":{candidates_accepted}"
                )
            }
            TraceEvent::Custom { name, data } => {
                format!(
                    "\"name\":\"{}\",\"data\":\"{}\"",
                    Self::escape_string(name),
                    Self::escape_string(data)
                )
            }
        };

        format!(
            "{{\"id\":{},\"pass\":{},\"timestamp_ns\":{},\"type\":\"{}\",{}}}",
            record.id,
            record.pass,
            record.timestamp_ns,
            record.event_type(),
            event_data
        )
    }

    fn format_many(&self, records: &[&TraceRecord]) -> String {
        let items: Vec<_> = records.iter().map(|r| self.format(r)).collect();
        if self.pretty {
            format!("[\n  {}\n]", items.join(",\n  "))
        } else {
            format!("[{}]", items.join(","))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
