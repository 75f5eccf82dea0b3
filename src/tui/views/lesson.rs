//! Lesson view: the rendered breakdown plus its enhancement panels.
//!
//! Left column: summary, steps, quiz. Right column: video panel, related
//! resources, concept graph, key data. The video panel is its own little
//! state machine — generating/failed there never touches the lesson state.

use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::core::explain::{Lesson, QuizQuestion};
use crate::core::gemini::VideoHandle;
use crate::tui::theme;
use crate::tui::widgets::concept_graph::ConceptGraphWidget;
use crate::tui::widgets::stat_bars::StatBars;

const SCROLL_PAGE: u16 = 10;

// ── Video panel ─────────────────────────────────────────────────────────────

/// Local state of the on-demand video summary region.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoPanel {
    Idle,
    Generating,
    Ready(VideoHandle),
    Failed(String),
}

// ── View state ──────────────────────────────────────────────────────────────

/// What a key press in the lesson view resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum LessonResult {
    None,
    /// Start (or retry) video generation for the current lesson.
    GenerateVideo,
    /// Open the downloaded video with the system player.
    PlayVideo(PathBuf),
    /// Materialize and open the generated illustration.
    OpenImage,
    /// Materialize and open the SVG diagram.
    OpenDiagram,
    /// Back to the home view, clearing the lesson.
    Reset,
}

pub struct LessonViewState {
    pub scroll: u16,
    pub show_answers: bool,
    pub video: VideoPanel,
}

impl Default for LessonViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl LessonViewState {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            show_answers: false,
            video: VideoPanel::Idle,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LessonResult {
        match key.code {
            KeyCode::Esc => LessonResult::Reset,
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                LessonResult::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                LessonResult::None
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(SCROLL_PAGE);
                LessonResult::None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(SCROLL_PAGE);
                LessonResult::None
            }
            KeyCode::Char('a') => {
                self.show_answers = !self.show_answers;
                LessonResult::None
            }
            KeyCode::Char('v') => match self.video {
                VideoPanel::Idle | VideoPanel::Failed(_) => LessonResult::GenerateVideo,
                _ => LessonResult::None,
            },
            KeyCode::Char('p') => match &self.video {
                VideoPanel::Ready(handle) => LessonResult::PlayVideo(handle.path.clone()),
                _ => LessonResult::None,
            },
            KeyCode::Char('i') => LessonResult::OpenImage,
            KeyCode::Char('d') => LessonResult::OpenDiagram,
            _ => LessonResult::None,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, lesson: &Lesson) {
        let columns = Layout::horizontal([
            Constraint::Percentage(58),
            Constraint::Percentage(42),
        ])
        .split(area);

        self.render_breakdown(frame, columns[0], lesson);
        self.render_side_panels(frame, columns[1], lesson);
    }

    fn render_breakdown(&self, frame: &mut Frame, area: Rect, lesson: &Lesson) {
        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(Span::styled(
            lesson.topic().to_string(),
            theme::title(),
        )));
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::raw(lesson.explanation.summary.clone())));
        if let Some(image) = &lesson.image {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                format!("✦ Illustration generated ({}) — press i to view", data_uri_kind(image)),
                theme::dim(),
            )));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("The Breakdown", theme::heading())));
        lines.push(Line::raw(""));

        for (i, step) in lesson.explanation.steps.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("{:>2}. ", i + 1), theme::highlight()),
                Span::raw(format!("{} ", step.icon)),
                Span::styled(step.title.clone(), theme::heading()),
            ]));
            lines.push(Line::from(Span::raw(format!("    {}", step.description))));
            lines.push(Line::raw(""));
        }

        lines.push(Line::from(Span::styled(
            "Check Your Understanding",
            theme::heading(),
        )));
        lines.push(Line::from(Span::styled(
            if self.show_answers {
                "(a hides answers)"
            } else {
                "(a reveals answers)"
            },
            theme::dim(),
        )));
        lines.push(Line::raw(""));
        for (i, question) in lesson.explanation.quiz.iter().enumerate() {
            lines.extend(self.quiz_lines(i, question));
        }

        let paragraph = Paragraph::new(lines)
            .block(theme::block("Lesson"))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn quiz_lines(&self, index: usize, question: &QuizQuestion) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(vec![
            Span::styled(format!("Q{}. ", index + 1), theme::highlight()),
            Span::raw(question.question.clone()),
        ])];

        for (i, option) in question.options.iter().enumerate() {
            let is_answer = i == question.correct_option_index;
            let marker = if self.show_answers && is_answer {
                "✔"
            } else {
                "·"
            };
            let style = if self.show_answers && is_answer {
                ratatui::style::Style::default().fg(theme::SUCCESS)
            } else {
                ratatui::style::Style::default().fg(theme::TEXT)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("   {marker} "), style),
                Span::styled(option.clone(), style),
            ]));
        }
        lines.push(Line::raw(""));
        lines
    }

    fn render_side_panels(&self, frame: &mut Frame, area: Rect, lesson: &Lesson) {
        let rows = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length((lesson.videos.len() as u16 + 2).max(3)),
            Constraint::Length((lesson.web.len() as u16 + 2).max(3)),
            Constraint::Min(6),
            Constraint::Length((lesson.explanation.related_stats.len() as u16 + 2).max(3)),
        ])
        .split(area);

        self.render_video_panel(frame, rows[0]);
        render_resource_list(frame, rows[1], "Videos", &lesson.videos);
        render_resource_list(frame, rows[2], "Resources", &lesson.web);
        self.render_graph(frame, rows[3], lesson);
        self.render_stats(frame, rows[4], lesson);
    }

    fn render_video_panel(&self, frame: &mut Frame, area: Rect) {
        let (line, block_title) = match &self.video {
            VideoPanel::Idle => (
                Line::from(Span::styled("press v to generate a video abstract", theme::muted())),
                "AI Video Summary",
            ),
            VideoPanel::Generating => (
                Line::from(Span::styled(
                    "Dreaming up a video… this takes a minute or two",
                    theme::highlight(),
                )),
                "AI Video Summary (working)",
            ),
            VideoPanel::Ready(handle) => (
                Line::from(vec![
                    Span::styled("ready — press p to play  ", theme::heading()),
                    Span::styled(
                        handle
                            .path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                        theme::dim(),
                    ),
                ]),
                "AI Video Summary",
            ),
            VideoPanel::Failed(message) => (
                Line::from(vec![
                    Span::styled(message.clone(), ratatui::style::Style::default().fg(theme::ERROR)),
                    Span::styled("  (v retries)", theme::dim()),
                ]),
                "AI Video Summary",
            ),
        };

        let panel = Paragraph::new(vec![line])
            .block(theme::block(block_title))
            .wrap(Wrap { trim: true });
        frame.render_widget(panel, area);
    }

    fn render_graph(&self, frame: &mut Frame, area: Rect, lesson: &Lesson) {
        let block = theme::block("Knowledge Graph");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            ConceptGraphWidget::new(&lesson.explanation.concept_graph),
            inner,
        );
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect, lesson: &Lesson) {
        let block = theme::block("Key Data");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(StatBars::new(&lesson.explanation.related_stats), inner);
    }
}

fn render_resource_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    resources: &[crate::core::explain::SearchResult],
) {
    let lines: Vec<Line> = if resources.is_empty() {
        vec![Line::from(Span::styled("none found", theme::dim()))]
    } else {
        resources
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled("• ", theme::highlight()),
                    Span::raw(r.title.clone()),
                    Span::raw(" "),
                    Span::styled(r.url.clone(), theme::dim()),
                ])
            })
            .collect()
    };

    let list = Paragraph::new(lines)
        .block(theme::block(title))
        .wrap(Wrap { trim: true });
    frame.render_widget(list, area);
}

// ── Asset materialization ───────────────────────────────────────────────────

/// Short human label for a data URI ("image/png" etc.).
fn data_uri_kind(uri: &str) -> String {
    uri.strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or("image")
        .to_string()
}

/// Decode a `data:<mime>;base64,<payload>` URI into a temp file and return
/// its path, picking a file extension from the mime type.
pub fn materialize_data_uri(uri: &str) -> std::io::Result<PathBuf> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidData, "not a data URI"))?;
    let (header, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidData, "not base64"))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let extension = match header {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "bin",
    };

    let mut tmp = tempfile::Builder::new()
        .prefix("spiega-")
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    tmp.write_all(&bytes)?;
    let (_, path) = tmp.keep().map_err(|e| e.error)?;
    Ok(path)
}

/// Write raw SVG markup to a temp file for viewing in a browser.
pub fn materialize_svg(svg: &str) -> std::io::Result<PathBuf> {
    let mut tmp = tempfile::Builder::new()
        .prefix("spiega-diagram-")
        .suffix(".svg")
        .tempfile()?;
    tmp.write_all(svg.as_bytes())?;
    let (_, path) = tmp.keep().map_err(|e| e.error)?;
    Ok(path)
}

/// Open a materialized asset with the system handler, logging failures.
pub fn open_path(path: &Path) -> bool {
    match open::that(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, path = ?path, "failed to open asset");
            false
        }
    }
}
