//! Ratatui widget that draws a [`RenderGraph`] on a braille canvas.
//!
//! World `y` grows downwards while the canvas `y` axis points up, so every
//! world `y` is negated on the way in.

use std::collections::HashMap;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Line as Segment, Rectangle},
        Block, Paragraph, Widget,
    },
};

use crate::core::graph::{RenderGraph, RenderNode};
use crate::core::tree::NodeId;

use super::theme::Theme;
use super::viewport::Viewport;

/// Created fresh each frame.
pub struct GraphView<'a> {
    graph: &'a RenderGraph,
    viewport: &'a Viewport,
    block: Option<Block<'a>>,
}

impl<'a> GraphView<'a> {
    pub fn new(graph: &'a RenderGraph, viewport: &'a Viewport) -> Self {
        Self {
            graph,
            viewport,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for GraphView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block.unwrap_or_default();

        if self.graph.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            let y = inner.y + inner.height.saturating_sub(2) / 2;
            let message = Paragraph::new(vec![
                Line::from("No structure to display"),
                Line::from("Build an index first, then reload"),
            ])
            .alignment(Alignment::Center)
            .style(Theme::empty_state_style());
            message.render(Rect { y, height: 2.min(inner.height), ..inner }, buf);
            return;
        }

        let by_id: HashMap<&NodeId, &RenderNode> =
            self.graph.nodes.iter().map(|n| (&n.id, n)).collect();
        let visible = self.viewport.visible();
        let graph = self.graph;

        Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([visible.min_x, visible.max_x])
            .y_bounds([-visible.max_y, -visible.min_y])
            .paint(|ctx| {
                // Connectors first so boxes and labels sit on top.
                for edge in &graph.edges {
                    let (Some(src), Some(dst)) = (by_id.get(&edge.source), by_id.get(&edge.target))
                    else {
                        continue;
                    };
                    ctx.draw(&Segment::new(
                        src.x + src.width / 2.0,
                        -(src.y + src.height),
                        dst.x + dst.width / 2.0,
                        -dst.y,
                        Theme::rgb(edge.style.stroke),
                    ));
                }
                ctx.layer();

                for node in &graph.nodes {
                    ctx.draw(&Rectangle {
                        x: node.x,
                        y: -(node.y + node.height),
                        width: node.width,
                        height: node.height,
                        color: Theme::node_border(&node.style),
                    });
                }
                ctx.layer();

                for node in &graph.nodes {
                    ctx.print(
                        node.x + node.width * 0.08,
                        -(node.y + node.height / 2.0),
                        Line::styled(node.label.clone(), Theme::node_label(&node.style)),
                    );
                }
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::compute_graph;
    use crate::core::geometry::LayoutConfig;
    use crate::core::tree::TreeNode;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn empty_graph_shows_the_placeholder() {
        let graph = RenderGraph::default();
        let viewport = Viewport::default();
        let area = Rect::new(0, 0, 50, 8);
        let mut buf = Buffer::empty(area);
        GraphView::new(&graph, &viewport).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("No structure to display"));
    }

    #[test]
    fn labels_land_in_the_buffer() {
        let root = TreeNode::new("root").with_id("r").with_children(vec![
            TreeNode::new("cat").with_id("a"),
            TreeNode::new("car").with_id("b"),
        ]);
        let graph = compute_graph(&root, &LayoutConfig::default()).unwrap();
        let mut viewport = Viewport::default();
        viewport.fit(graph.bounds().unwrap());

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        GraphView::new(&graph, &viewport).render(area, &mut buf);
        let text = buffer_text(&buf);
        for label in ["root", "cat", "car"] {
            assert!(text.contains(label), "missing {label}");
        }
    }
}
