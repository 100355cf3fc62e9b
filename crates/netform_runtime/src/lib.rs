//! CLI, sessions, and serialization for netform.
//!
//! This crate provides:
//! - [`Session`] - Applies a sequence of transforms to a network, with tracing
//! - Network serialization and deserialization
//! - The `netform` command-line tool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod serialize;
pub mod session;

pub use serialize::{from_bytes, load_from_file, save_to_file, to_bytes};
pub use session::{PassSummary, Session};
