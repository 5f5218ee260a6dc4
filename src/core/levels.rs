//! Depth assignment for styling.

use std::collections::HashMap;

use super::tree::{LayoutTree, NodeId, NodeIndex};

/// Node id → depth (root = 0).
pub type LevelMap = HashMap<NodeId, usize>;

/// Pre-order walk recording every node's depth under its resolved id.
pub fn assign_levels(tree: &LayoutTree<'_>) -> LevelMap {
    let mut levels = LevelMap::with_capacity(tree.len());
    visit(tree, tree.root, 0, &mut levels);
    levels
}

fn visit(tree: &LayoutTree<'_>, index: NodeIndex, depth: usize, levels: &mut LevelMap) {
    let node = tree.get(index);
    levels.insert(node.id.clone(), depth);
    for &child in &node.children {
        visit(tree, child, depth + 1, levels);
    }
}
