//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: errors and network descriptions.

mod net;
