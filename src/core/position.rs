//! Top-down placement: every node gets the top-left corner of its box.
//!
//! Children are packed left-to-right inside their parent's subtree span and
//! the parent is centred over the combined span of its children (not over
//! any single child).  The whole tree is centred on `x = 0` by
//! [`layout_centered`].

use super::geometry::LayoutConfig;
use super::tree::{LayoutTree, NodeId, NodeIndex, TreeNode};
use super::width::WidthTable;

/// A node with its final coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode<'a> {
    pub id: NodeId,
    /// Arena slot, so later passes can reach the node without a lookup.
    pub index: NodeIndex,
    pub x: f64,
    pub y: f64,
    pub node: &'a TreeNode,
}

/// Place every node, starting the root's span at `(x0, y0)`.
///
/// Output is in pre-order and covers each arena node exactly once.
pub fn layout<'a>(
    tree: &LayoutTree<'a>,
    widths: &WidthTable,
    config: &LayoutConfig,
    x0: f64,
    y0: f64,
) -> Vec<PositionedNode<'a>> {
    let mut out = Vec::with_capacity(tree.len());
    place(tree, tree.root, x0, y0, widths, config, &mut out);
    out
}

/// [`layout`] seeded with `x0 = -width(root) / 2`, `y0 = 0`.
pub fn layout_centered<'a>(
    tree: &LayoutTree<'a>,
    widths: &WidthTable,
    config: &LayoutConfig,
) -> Vec<PositionedNode<'a>> {
    let x0 = -widths.width(tree.root) / 2.0;
    layout(tree, widths, config, x0, 0.0)
}

fn place<'a>(
    tree: &LayoutTree<'a>,
    index: NodeIndex,
    x: f64,
    y: f64,
    widths: &WidthTable,
    config: &LayoutConfig,
    out: &mut Vec<PositionedNode<'a>>,
) {
    let node = tree.get(index);
    // Reserve the parent's slot so the output stays pre-order; its x is only
    // known once the children are placed.
    let slot = out.len();
    out.push(PositionedNode {
        id: node.id.clone(),
        index,
        x,
        y,
        node: node.source,
    });

    if node.children.is_empty() {
        return;
    }

    let child_y = y + config.level_height;
    let mut cursor = x;
    for &child in &node.children {
        place(tree, child, cursor, child_y, widths, config, out);
        cursor += widths.width(child) + config.sibling_spacing;
    }
    let span_end = cursor - config.sibling_spacing;
    out[slot].x = (x + span_end) / 2.0 - config.node_width / 2.0;
}
