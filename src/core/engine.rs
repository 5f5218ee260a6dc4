//! One full layout pass: arena → widths → levels → positions → graph.

use super::error::LayoutError;
use super::geometry::LayoutConfig;
use super::graph::{self, RenderGraph};
use super::levels::assign_levels;
use super::position::layout_centered;
use super::tree::{LayoutTree, TreeNode};
use super::width::WidthTable;

/// Lay out `root` and return the graph to draw.  Synchronous and pure.
pub fn compute_graph(root: &TreeNode, config: &LayoutConfig) -> Result<RenderGraph, LayoutError> {
    let tree = LayoutTree::build(root, config.max_depth)?;
    let widths = WidthTable::measure(&tree, config);
    let levels = assign_levels(&tree);
    let positioned = layout_centered(&tree, &widths, config);
    Ok(graph::materialize(&tree, &positioned, &levels, config))
}

/// [`compute_graph`] for an optional root; `None` yields the empty graph.
pub fn compute_optional(
    root: Option<&TreeNode>,
    config: &LayoutConfig,
) -> Result<RenderGraph, LayoutError> {
    match root {
        Some(root) => compute_graph(root, config),
        None => Ok(RenderGraph::default()),
    }
}
