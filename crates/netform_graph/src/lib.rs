//! Operator graph construction, mutation, and export for netform.
//!
//! This crate provides:
//! - [`Graph`] - Indexed operator nodes with parent/child adjacency
//! - [`Node`] - A single operator with its active flag and neighbor maps
//! - Boundary helpers and [`Graph::replace_subgraph`] for rewrite rules
//! - [`Graph::to_net`] - Export back to a topologically ordered [`NetDef`]
//!
//! [`NetDef`]: netform_foundation::NetDef

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod export;
pub mod graph;
pub mod node;
pub mod subgraph;

pub use graph::Graph;
pub use node::{NeighborMap, Node};
