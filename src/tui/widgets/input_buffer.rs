//! Topic input buffer with cursor management.
//!
//! Single-line editor used by the home view. Key handling lives here so the
//! view only has to interpret the resulting [`InputAction`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press did to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Buffer contents changed or the cursor moved.
    Edited,
    /// Enter was pressed; the view decides whether to submit.
    Submit,
    /// The key was not an editing key.
    Ignored,
}

/// A simple text input buffer with cursor positioning.
#[derive(Debug, Default)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer pre-filled with `text`, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let content = text.into();
        let cursor = content.len();
        Self { content, cursor }
    }

    /// Apply an editing key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('w') => {
                    self.delete_word();
                    InputAction::Edited
                }
                KeyCode::Char('u') => {
                    self.clear();
                    InputAction::Edited
                }
                _ => InputAction::Ignored,
            };
        }

        match key.code {
            KeyCode::Enter => InputAction::Submit,
            KeyCode::Char(c) => {
                self.insert_char(c);
                InputAction::Edited
            }
            KeyCode::Backspace => {
                self.backspace();
                InputAction::Edited
            }
            KeyCode::Delete => {
                self.delete();
                InputAction::Edited
            }
            KeyCode::Left => {
                self.move_left();
                InputAction::Edited
            }
            KeyCode::Right => {
                self.move_right();
                InputAction::Edited
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputAction::Edited
            }
            KeyCode::End => {
                self.cursor = self.content.len();
                InputAction::Edited
            }
            _ => InputAction::Ignored,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
            self.content.drain(self.cursor..next);
        }
    }

    /// Delete the word (and trailing spaces) before the cursor.
    fn delete_word(&mut self) {
        let head = &self.content[..self.cursor];
        let trimmed = head.trim_end_matches(' ');
        let start = trimmed
            .rfind(' ')
            .map(|i| i + 1)
            .unwrap_or(0);
        self.content.drain(start..self.cursor);
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
        }
    }

    /// Take the content out, resetting the buffer.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.cursor = self.content.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }
}
