//! Errors surfaced by the layout pipeline.

use thiserror::Error;

/// Failure to lay out an input tree.
///
/// Missing ids and empty roots are recovered locally and never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The tree nests deeper than the configured recursion limit.  Cyclic
    /// input would otherwise never terminate, so this is where it ends up.
    #[error("malformed tree: nesting exceeds the depth limit of {limit} (at {path})")]
    MalformedTree { limit: usize, path: String },
}
