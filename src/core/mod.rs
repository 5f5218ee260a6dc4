//! Core layout engine: the tree model, the geometry passes and the render graph.
//!
//! Nothing in this module depends on any TUI or async crate.  Every pass is a
//! pure function over a borrowed input tree.

pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod geometry;
pub mod graph;
pub mod levels;
pub mod position;
pub mod tree;
pub mod width;
