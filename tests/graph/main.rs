//! Integration tests for Layer 1: Graph
//!
//! Tests for graph construction, subgraph rewriting, and export.

mod rewrite;
