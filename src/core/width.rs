//! Subtree widths: the horizontal footprint each subtree needs.

use super::geometry::LayoutConfig;
use super::tree::{LayoutTree, NodeIndex};

/// Widths of every subtree in one [`LayoutTree`], indexed like its arena.
#[derive(Debug, Clone, PartialEq)]
pub struct WidthTable {
    widths: Vec<f64>,
}

impl WidthTable {
    /// Measure every subtree bottom-up, visiting each node exactly once.
    pub fn measure(tree: &LayoutTree<'_>, config: &LayoutConfig) -> Self {
        let mut widths = vec![0.0; tree.len()];
        measure_node(tree, tree.root, config, &mut widths);
        Self { widths }
    }

    /// Width of the subtree rooted at `index`.
    pub fn width(&self, index: NodeIndex) -> f64 {
        self.widths[index]
    }
}

/// `max(node_width, Σ child widths + (k-1) · sibling_spacing)`; leaves are
/// exactly `node_width`.
fn measure_node(
    tree: &LayoutTree<'_>,
    index: NodeIndex,
    config: &LayoutConfig,
    widths: &mut [f64],
) -> f64 {
    let children = &tree.get(index).children;
    let width = if children.is_empty() {
        config.node_width
    } else {
        let gaps = (children.len() - 1) as f64 * config.sibling_spacing;
        let span: f64 = children
            .iter()
            .map(|&child| measure_node(tree, child, config, widths))
            .sum();
        (span + gaps).max(config.node_width)
    };
    widths[index] = width;
    width
}
