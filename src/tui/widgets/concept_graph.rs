//! Concept graph widget for ratatui.
//!
//! Renders the lesson's force-directed graph data as a flat adjacency list
//! with Unicode arrows: each node line is followed by its outgoing links,
//! color-coded by node group, with a scroll offset for tall graphs.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::core::explain::{ConceptGraph, ConceptLink};
use crate::tui::theme;

/// Cycle of group colors; groups beyond the palette wrap around.
const GROUP_COLORS: [Color; 5] = [
    theme::PRIMARY_LIGHT,
    theme::ACCENT,
    theme::INFO,
    theme::WARNING,
    theme::SUCCESS,
];

fn group_color(group: i64) -> Color {
    let idx = group.rem_euclid(GROUP_COLORS.len() as i64) as usize;
    GROUP_COLORS[idx]
}

/// Link weight rendered as a short dash run (capped).
fn weight_marker(value: i64) -> String {
    let n = value.clamp(1, 4) as usize;
    format!("{}▶", "─".repeat(n))
}

/// A concept graph rendered as a flat adjacency list.
pub struct ConceptGraphWidget<'a> {
    graph: &'a ConceptGraph,
    scroll_offset: usize,
}

impl<'a> ConceptGraphWidget<'a> {
    pub fn new(graph: &'a ConceptGraph) -> Self {
        Self {
            graph,
            scroll_offset: 0,
        }
    }

    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    fn links_from(&self, id: &str) -> impl Iterator<Item = &'a ConceptLink> {
        let id = id.to_string();
        self.graph
            .links
            .iter()
            .filter(move |link| link.source == id)
    }

    /// Total line count before scrolling (used by views to clamp offsets).
    pub fn line_count(graph: &ConceptGraph) -> usize {
        graph.nodes.len() + graph.links.len()
    }

    fn build_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for node in &self.graph.nodes {
            let color = group_color(node.group);
            lines.push(Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::styled(
                    node.id.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]));

            for link in self.links_from(&node.id) {
                lines.push(Line::from(vec![
                    Span::styled("   ".to_string(), Style::default()),
                    Span::styled(weight_marker(link.value), theme::dim()),
                    Span::raw(" "),
                    Span::styled(link.target.clone(), Style::default().fg(theme::TEXT)),
                ]));
            }
        }

        // Links whose source is not a listed node still get shown, at the end.
        let known: Vec<&str> = self.graph.nodes.iter().map(|n| n.id.as_str()).collect();
        for link in &self.graph.links {
            if !known.contains(&link.source.as_str()) {
                lines.push(Line::from(vec![
                    Span::styled(link.source.clone(), theme::muted()),
                    Span::raw(" "),
                    Span::styled(weight_marker(link.value), theme::dim()),
                    Span::raw(" "),
                    Span::styled(link.target.clone(), Style::default().fg(theme::TEXT)),
                ]));
            }
        }

        lines
    }
}

impl Widget for ConceptGraphWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let lines = self.build_lines();
        let visible = lines
            .into_iter()
            .skip(self.scroll_offset)
            .take(area.height as usize);

        for (row, line) in visible.enumerate() {
            buf.set_line(area.x, area.y + row as u16, &line, area.width);
        }
    }
}
