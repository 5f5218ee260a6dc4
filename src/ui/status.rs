//! Bottom status bar.

use ratatui::{buffer::Buffer, layout::Rect, widgets::{Paragraph, Widget}};

use crate::core::graph::RenderGraph;
use crate::core::tree::IndexType;

use super::theme::Theme;

pub struct StatusBar<'a> {
    pub index_type: Option<IndexType>,
    pub graph: &'a RenderGraph,
    /// Transient message; replaces the key hint when present.
    pub message: Option<&'a str>,
    pub hint: &'a str,
    pub is_error: bool,
}

impl StatusBar<'_> {
    pub fn text(&self) -> String {
        let kind = self.index_type.map_or("no index", IndexType::label);
        let tail = self.message.unwrap_or(self.hint);
        format!(
            " {kind} | nodes: {} | connections: {} | {tail}",
            self.graph.nodes.len(),
            self.graph.edges.len(),
        )
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.is_error {
            Theme::error_style()
        } else {
            Theme::status_bar_style()
        };
        Paragraph::new(self.text()).style(style).render(area, buf);
    }
}
