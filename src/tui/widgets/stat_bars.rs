//! Horizontal bar chart widget for the related-statistics series.
//!
//! Each point becomes one row: right-padded label, a bar scaled against the
//! series maximum, and the numeric value.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::core::explain::StatPoint;
use crate::tui::theme;

const LABEL_WIDTH: usize = 16;
const BAR_CHAR: &str = "█";

pub struct StatBars<'a> {
    stats: &'a [StatPoint],
}

impl<'a> StatBars<'a> {
    pub fn new(stats: &'a [StatPoint]) -> Self {
        Self { stats }
    }

    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let max = self
            .stats
            .iter()
            .map(|s| s.value.abs())
            .fold(0.0_f64, f64::max);

        let bar_budget = width.saturating_sub(LABEL_WIDTH + 10).max(4);

        self.stats
            .iter()
            .map(|stat| {
                let mut label: String = stat.label.chars().take(LABEL_WIDTH).collect();
                while label.chars().count() < LABEL_WIDTH {
                    label.push(' ');
                }

                let filled = if max > 0.0 {
                    ((stat.value.abs() / max) * bar_budget as f64).round() as usize
                } else {
                    0
                };
                // A nonzero value always shows at least one cell.
                let filled = if stat.value != 0.0 { filled.max(1) } else { 0 };

                Line::from(vec![
                    Span::styled(label, theme::muted()),
                    Span::raw(" "),
                    Span::styled(
                        BAR_CHAR.repeat(filled.min(bar_budget)),
                        Style::default().fg(theme::PRIMARY_LIGHT),
                    ),
                    Span::raw(" "),
                    Span::styled(format_value(stat.value), theme::dim()),
                ])
            })
            .collect()
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

impl Widget for StatBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let lines = self.build_lines(area.width as usize);
        for (row, line) in lines.into_iter().take(area.height as usize).enumerate() {
            buf.set_line(area.x, area.y + row as u16, &line, area.width);
        }
    }
}
