//! Subgraph pattern matching, rewrite rules, and the transform driver.
//!
//! This crate provides:
//! - [`Transform`] - The accept/validate/rewrite capability of a rewrite rule
//! - [`MatchStrategy`] - How the matcher grows a candidate subgraph
//! - [`PatternMatcher`] - Greedy backtracking search for non-overlapping matches
//! - [`apply_matches`] - Staleness-aware application of matches
//! - [`Transformer`] - Build, match, apply, export
//! - [`TransformRegistry`] - String-keyed transform constructors

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod apply;
pub mod pattern;
pub mod registry;
pub mod strategy;
pub mod transform;
pub mod transformer;
pub mod transforms;

pub use apply::{ApplyReport, MatchOutcome, apply_matches};
pub use pattern::{Match, MatcherConfig, PatternMatcher, SearchStats};
pub use registry::{TransformConstructor, TransformRegistry, apply_transform, create_transform};
pub use strategy::MatchStrategy;
pub use transform::Transform;
pub use transformer::{PassReport, Transformer, TransformerConfig};
pub use transforms::FuseSequence;
