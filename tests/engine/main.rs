//! Integration tests for Layer 2: Engine
//!
//! Tests for pattern matching, match application, and built-in transforms.

mod fusion;
mod properties;
