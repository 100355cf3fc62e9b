//! Tracing of transform passes for netform.
//!
//! This crate provides:
//! - [`Tracer`] - Records pass events with zero overhead when disabled
//! - [`TraceBuffer`] - Ring buffer of recent trace records
//! - [`HumanFormatter`] / [`JsonFormatter`] - Trace output formats

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod trace;

pub use trace::{
    HumanFormatter, JsonFormatter, TraceBuffer, TraceBufferStats, TraceEvent, TraceFormatter,
    TraceOutput, TraceRecord, Tracer, TracerConfig,
};
