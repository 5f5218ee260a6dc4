//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

use crate::core::graph::{Fill, NodeStyle, Rgb};

/// Central theme; every widget takes its colours from here.
pub struct Theme;

impl Theme {
    // ── graph ──────────────────────────────────────────────────
    pub fn rgb(c: Rgb) -> Color {
        Color::Rgb(c.0, c.1, c.2)
    }

    /// Outline colour of a node box.
    pub fn node_border(style: &NodeStyle) -> Color {
        Self::rgb(style.border)
    }

    /// Label style; a terminal cell can't hold a gradient, so its leading
    /// stop stands in as the background.
    pub fn node_label(style: &NodeStyle) -> Style {
        let bg = match style.fill {
            Fill::Gradient { from, .. } => from,
            Fill::Solid { color } => color,
        };
        let s = Style::default().fg(Self::rgb(style.text)).bg(Self::rgb(bg));
        if style.bold {
            s.add_modifier(Modifier::BOLD)
        } else {
            s
        }
    }

    pub fn empty_state_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn error_style() -> Style {
        Style::default().bg(Color::Red).fg(Color::White)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::DEPTH_STYLES;

    #[test]
    fn root_label_is_bold_on_its_first_gradient_stop() {
        let style = Theme::node_label(&DEPTH_STYLES[0]);
        assert_eq!(style.bg, Some(Color::Rgb(0x63, 0x66, 0xf1)));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        let deep = Theme::node_label(&DEPTH_STYLES[3]);
        assert_eq!(deep.bg, Some(Color::Rgb(0x33, 0x41, 0x55)));
        assert!(!deep.add_modifier.contains(Modifier::BOLD));
    }
}
