//! Built-in transforms.

pub mod fuse;

pub use fuse::FuseSequence;
