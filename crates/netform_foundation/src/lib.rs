//! Core types, errors, and network descriptions for netform.
//!
//! This crate provides:
//! - [`NodeIndex`] - Stable index of a node within a graph
//! - [`NetDef`] / [`OperatorDef`] - The serializable network description
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod net;

pub use error::{Error, ErrorContext, ErrorKind, Result, SearchLimit};
pub use net::{NetDef, OperatorDef};

/// Index of a node within a graph.
///
/// Indices are dense and stable: a node keeps its index for the lifetime of
/// the graph, even after it has been deactivated.
pub type NodeIndex = usize;
