//! netform - Rule-driven subgraph matching and rewriting for operator networks
//!
//! This crate re-exports all layers of the netform system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: netform_runtime    — Sessions, CLI, serialization
//! Layer 3: netform_debug      — Tracing of transform passes
//! Layer 2: netform_engine     — Transforms, pattern matching, apply, driver
//! Layer 1: netform_graph      — Operator graph, construction, export
//! Layer 0: netform_foundation — Core types (NetDef, NodeIndex, Error)
//! ```

pub use netform_debug as debug;
pub use netform_engine as engine;
pub use netform_foundation as foundation;
pub use netform_graph as graph;
pub use netform_runtime as runtime;
