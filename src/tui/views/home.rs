//! Home view: topic input plus selectable sample topics.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::core::topic::SAMPLE_TOPICS;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::{InputAction, InputBuffer};

/// What a key press in the home view resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeResult {
    None,
    /// Submit this topic for a new lesson cycle.
    Submit(String),
    Quit,
}

/// Home view state.
pub struct HomeState {
    pub input: InputBuffer,
    /// Highlighted sample topic, if the selection list has focus.
    pub selected_sample: Option<usize>,
}

impl Default for HomeState {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeState {
    pub fn new() -> Self {
        Self {
            input: InputBuffer::new(),
            selected_sample: None,
        }
    }

    /// Pre-fill the input (topic seeded from a file).
    pub fn seed(&mut self, topic: impl Into<String>) {
        self.input.set_text(topic);
        self.selected_sample = None;
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.selected_sample = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> HomeResult {
        match key.code {
            KeyCode::Esc => return HomeResult::Quit,
            KeyCode::Down => {
                self.selected_sample = Some(match self.selected_sample {
                    Some(i) => (i + 1) % SAMPLE_TOPICS.len(),
                    None => 0,
                });
                return HomeResult::None;
            }
            KeyCode::Up => {
                self.selected_sample = Some(match self.selected_sample {
                    Some(0) | None => SAMPLE_TOPICS.len() - 1,
                    Some(i) => i - 1,
                });
                return HomeResult::None;
            }
            _ => {}
        }

        match self.input.handle_key(key) {
            InputAction::Submit => {
                if !self.input.is_blank() {
                    HomeResult::Submit(self.input.take())
                } else if let Some(i) = self.selected_sample {
                    HomeResult::Submit(SAMPLE_TOPICS[i].to_string())
                } else {
                    // Blank input with nothing selected: no-op by contract.
                    HomeResult::None
                }
            }
            InputAction::Edited => {
                self.selected_sample = None;
                HomeResult::None
            }
            InputAction::Ignored => HomeResult::None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(SAMPLE_TOPICS.len() as u16),
            Constraint::Min(1),
        ])
        .split(area);

        let hero = Paragraph::new(vec![
            Line::from(Span::styled("Understand any topic.", theme::title())),
            Line::from(Span::styled("Step by step.", theme::heading())),
            Line::raw(""),
            Line::from(Span::styled(
                "Enter a subject and get a breakdown with steps, a quiz,",
                theme::muted(),
            )),
            Line::from(Span::styled(
                "a concept map, related links, and key data.",
                theme::muted(),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(hero, rows[1].union(rows[0]));

        // Input box, centered.
        let input_area = centered(rows[3], 60);
        let input = Paragraph::new(Line::from(vec![
            Span::styled("❯ ", theme::highlight()),
            Span::raw(self.input.text().to_string()),
        ]))
        .block(theme::block_focused("What do you want to learn?"));
        frame.render_widget(input, input_area);
        let cursor_x = input_area.x + 3 + self.input.text()[..self.input.cursor_position()]
            .chars()
            .count() as u16;
        frame.set_cursor_position(Position::new(
            cursor_x.min(input_area.right().saturating_sub(2)),
            input_area.y + 1,
        ));

        // Sample topics.
        let samples: Vec<Line> = SAMPLE_TOPICS
            .iter()
            .enumerate()
            .map(|(i, topic)| {
                let style = if self.selected_sample == Some(i) {
                    theme::highlight()
                } else {
                    theme::muted()
                };
                Line::from(Span::styled(format!("  {topic}  "), style))
            })
            .collect();
        frame.render_widget(
            Paragraph::new(samples).alignment(Alignment::Center),
            rows[4],
        );
    }
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    let x = area.x + (area.width - width) / 2;
    Rect::new(x, area.y, width, area.height)
}
