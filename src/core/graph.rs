//! The renderable graph: styled nodes and parent→child connectors.
//!
//! A [`RenderGraph`] is the only thing handed to a rendering surface.  It is
//! rebuilt from scratch on every layout pass and never patched in place.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use super::geometry::{Bounds, LayoutConfig};
use super::levels::LevelMap;
use super::position::PositionedNode;
use super::tree::{LayoutTree, Metadata, NodeId, NodeIndex};

// ───────────────────────────────────────── styles ────────────

/// 24-bit colour, serialised as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Background of a node box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fill {
    /// Diagonal gradient (135°) from `from` to `to`.
    Gradient { from: Rgb, to: Rgb },
    Solid { color: Rgb },
}

/// Visual scheme of a node.  One per depth bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeStyle {
    pub fill: Fill,
    pub border: Rgb,
    pub text: Rgb,
    pub bold: bool,
}

/// Connector appearance; identical for every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeStyle {
    pub stroke: Rgb,
    pub stroke_width: f64,
    pub animated: bool,
    pub routing: EdgeRouting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRouting {
    SmoothStep,
}

const INDIGO: Rgb = Rgb(0x63, 0x66, 0xf1);
const VIOLET: Rgb = Rgb(0x8b, 0x5c, 0xf6);
const EMERALD: Rgb = Rgb(0x10, 0xb9, 0x81);
const CYAN: Rgb = Rgb(0x06, 0xb6, 0xd4);
const SLATE: Rgb = Rgb(0x33, 0x41, 0x55);
const SLATE_BORDER: Rgb = Rgb(0x47, 0x55, 0x69);
const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

/// Depth 0, 1, 2 each get a gradient; everything deeper shares the last entry.
pub const DEPTH_STYLES: [NodeStyle; 4] = [
    NodeStyle {
        fill: Fill::Gradient {
            from: INDIGO,
            to: VIOLET,
        },
        border: INDIGO,
        text: WHITE,
        bold: true,
    },
    NodeStyle {
        fill: Fill::Gradient {
            from: VIOLET,
            to: EMERALD,
        },
        border: VIOLET,
        text: WHITE,
        bold: false,
    },
    NodeStyle {
        fill: Fill::Gradient {
            from: EMERALD,
            to: CYAN,
        },
        border: EMERALD,
        text: WHITE,
        bold: false,
    },
    NodeStyle {
        fill: Fill::Solid { color: SLATE },
        border: SLATE_BORDER,
        text: WHITE,
        bold: false,
    },
];

pub const EDGE_STYLE: EdgeStyle = EdgeStyle {
    stroke: INDIGO,
    stroke_width: 2.0,
    animated: true,
    routing: EdgeRouting::SmoothStep,
};

/// Style bucket for `depth`, clamped to the last table entry.
pub fn style_for_depth(depth: usize) -> &'static NodeStyle {
    &DEPTH_STYLES[depth.min(DEPTH_STYLES.len() - 1)]
}

// ───────────────────────────────────────── graph ─────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: NodeId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub depth: usize,
    pub style: NodeStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl RenderNode {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_rect(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

impl RenderGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Box around every node, or `None` for an empty graph.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(RenderNode::bounds)
            .reduce(Bounds::union)
    }
}

/// Turn positioned nodes and their depths into a [`RenderGraph`].
///
/// Edges come from a fresh walk of `tree`, and one is emitted only when both
/// endpoints are among the positioned nodes.
pub fn materialize(
    tree: &LayoutTree<'_>,
    positioned: &[PositionedNode<'_>],
    levels: &LevelMap,
    config: &LayoutConfig,
) -> RenderGraph {
    let nodes: Vec<RenderNode> = positioned
        .iter()
        .map(|p| {
            let depth = levels
                .get(&p.id)
                .copied()
                .unwrap_or_else(|| tree.get(p.index).path.depth());
            RenderNode {
                id: p.id.clone(),
                label: p.node.label.clone(),
                x: p.x,
                y: p.y,
                width: config.node_width,
                height: config.node_height,
                depth,
                style: *style_for_depth(depth),
                metadata: p.node.metadata.clone(),
            }
        })
        .collect();

    let known: HashSet<&NodeId> = positioned.iter().map(|p| &p.id).collect();
    let mut edges = Vec::with_capacity(nodes.len().saturating_sub(1));
    collect_edges(tree, tree.root, &known, &mut edges);

    RenderGraph { nodes, edges }
}

fn collect_edges(
    tree: &LayoutTree<'_>,
    index: NodeIndex,
    known: &HashSet<&NodeId>,
    edges: &mut Vec<RenderEdge>,
) {
    let parent = tree.get(index);
    for &child_index in &parent.children {
        let child = tree.get(child_index);
        if known.contains(&parent.id) && known.contains(&child.id) {
            // A node has one parent and a unique id, so its id names the edge.
            edges.push(RenderEdge {
                id: format!("edge-{}", child.id),
                source: parent.id.clone(),
                target: child.id.clone(),
                style: EDGE_STYLE,
            });
        }
        collect_edges(tree, child_index, known, edges);
    }
}
