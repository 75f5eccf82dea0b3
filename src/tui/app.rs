use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::core::explain::{run_cycle, CycleOutcome, ExplainSession, LessonState};

use super::events::{AppEvent, Notification, NotificationLevel};
use super::services::Services;
use super::theme;
use super::views::home::{HomeResult, HomeState};
use super::views::lesson::{
    materialize_data_uri, materialize_svg, open_path, LessonResult, LessonViewState, VideoPanel,
};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const VIDEO_FAILED_MESSAGE: &str = "Could not generate video.";

/// The four screens the lesson state maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Home,
    Loading,
    Lesson,
    Error,
}

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Epoch-tagged aggregate lesson state — the single source of truth.
    session: ExplainSession,
    /// Home view state.
    home: HomeState,
    /// Lesson view state (scroll, quiz answers, video panel).
    lesson_view: LessonViewState,
    /// Last successfully submitted topic, for retry from the error state.
    last_topic: Option<String>,
    /// Active notifications (newest shown in the footer).
    notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    /// Tick counter driving the loading spinner.
    ticks: u64,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Sender for pushing events from within the app.
    event_tx: mpsc::UnboundedSender<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        services: Services,
    ) -> Self {
        Self {
            running: true,
            session: ExplainSession::new(),
            home: HomeState::new(),
            lesson_view: LessonViewState::new(),
            last_topic: None,
            notifications: Vec::new(),
            notification_counter: 0,
            ticks: 0,
            event_rx,
            event_tx,
            services,
        }
    }

    /// Pre-fill the home input with a topic seeded from a file.
    pub fn seed_topic(&mut self, topic: impl Into<String>) {
        self.home.seed(topic);
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => self.on_tick(),
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.on_input(event);
                    }
                }
                maybe_app_event = self.event_rx.recv() => {
                    if let Some(event) = maybe_app_event {
                        self.on_app_event(event);
                    }
                }
            }
        }

        Ok(())
    }

    fn on_tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
        for notification in &mut self.notifications {
            notification.ttl_ticks = notification.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    fn on_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.on_tick(),
            AppEvent::Input(input) => self.on_input(input),
            AppEvent::CycleSettled { epoch, outcome } => {
                let applied = self.session.settle(epoch, outcome);
                if applied && matches!(self.session.state(), LessonState::Ready(_)) {
                    self.push_notification(
                        "Lesson ready".to_string(),
                        NotificationLevel::Success,
                    );
                }
            }
            AppEvent::VideoSettled { epoch, result } => self.on_video_settled(epoch, result),
            AppEvent::Notification(notification) => self.notifications.push(notification),
            AppEvent::Quit => self.running = false,
        }
    }

    fn on_input(&mut self, event: Event) {
        let Event::Key(key) = event else { return };
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Ctrl+C always quits, regardless of view.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        match self.screen() {
            Screen::Home => self.on_home_key(key),
            Screen::Loading => {
                if key.code == KeyCode::Esc {
                    self.reset();
                }
            }
            Screen::Lesson => self.on_lesson_key(key),
            Screen::Error => self.on_error_key(key),
        }
    }

    /// Which screen the aggregate state maps to, as a borrow-free tag.
    fn screen(&self) -> Screen {
        match self.session.state() {
            LessonState::Idle => Screen::Home,
            LessonState::Loading { .. } => Screen::Loading,
            LessonState::Ready(_) => Screen::Lesson,
            LessonState::Failed(_) => Screen::Error,
        }
    }

    fn on_home_key(&mut self, key: KeyEvent) {
        match self.home.handle_key(key) {
            HomeResult::Submit(topic) => self.submit_topic(&topic),
            HomeResult::Quit => self.running = false,
            HomeResult::None => {}
        }
    }

    fn on_error_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => {
                if let Some(topic) = self.last_topic.clone() {
                    self.submit_topic(&topic);
                }
            }
            KeyCode::Esc => self.reset(),
            _ => {}
        }
    }

    fn on_lesson_key(&mut self, key: KeyEvent) {
        match self.lesson_view.handle_key(key) {
            LessonResult::None => {}
            LessonResult::Reset => self.reset(),
            LessonResult::GenerateVideo => self.start_video(),
            LessonResult::PlayVideo(path) => {
                if !open_path(&path) {
                    self.push_notification(
                        "Could not open the video player".to_string(),
                        NotificationLevel::Warning,
                    );
                }
            }
            LessonResult::OpenImage => self.open_image(),
            LessonResult::OpenDiagram => self.open_diagram(),
        }
    }

    // ── Cycle orchestration ─────────────────────────────────────────────

    fn submit_topic(&mut self, topic: &str) {
        let Some(client) = self.services.client.clone() else {
            self.push_notification(
                "No API key configured. Set GEMINI_API_KEY or gemini.api_key in config.toml."
                    .to_string(),
                NotificationLevel::Error,
            );
            return;
        };

        let Some((epoch, topic)) = self.session.submit(topic) else {
            return;
        };

        // Fresh cycle: no enhancement or video state may survive from the
        // previous lesson.
        self.lesson_view = LessonViewState::new();
        self.last_topic = Some(topic.clone());

        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = run_cycle(client.as_ref(), &topic).await;
            let _ = tx.send(AppEvent::CycleSettled { epoch, outcome });
        });
    }

    fn start_video(&mut self) {
        let Some(client) = self.services.client.clone() else {
            self.push_notification(
                "No API key configured; video generation is unavailable.".to_string(),
                NotificationLevel::Error,
            );
            return;
        };
        let LessonState::Ready(lesson) = self.session.state() else {
            return;
        };

        let topic = lesson.topic().to_string();
        let epoch = self.session.epoch();
        self.lesson_view.video = VideoPanel::Generating;

        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = client.generate_video(&topic).await.map_err(|e| {
                tracing::error!(error = %e, %topic, "video generation failed");
                VIDEO_FAILED_MESSAGE.to_string()
            });
            let _ = tx.send(AppEvent::VideoSettled { epoch, result });
        });
    }

    fn on_video_settled(
        &mut self,
        epoch: u64,
        result: Result<crate::core::gemini::VideoHandle, String>,
    ) {
        if epoch != self.session.epoch() {
            tracing::debug!(epoch, "discarding stale video result");
            return;
        }
        self.lesson_view.video = match result {
            Ok(handle) => {
                self.push_notification(
                    "Video summary ready — press p to play".to_string(),
                    NotificationLevel::Success,
                );
                VideoPanel::Ready(handle)
            }
            Err(message) => VideoPanel::Failed(message),
        };
    }

    fn reset(&mut self) {
        self.session.reset();
        self.lesson_view = LessonViewState::new();
        self.home.clear();
        self.last_topic = None;
    }

    fn open_image(&mut self) {
        let LessonState::Ready(lesson) = self.session.state() else {
            return;
        };
        let Some(image) = lesson.image.clone() else {
            self.push_notification(
                "No illustration was generated for this lesson.".to_string(),
                NotificationLevel::Info,
            );
            return;
        };

        match materialize_data_uri(&image) {
            Ok(path) => {
                open_path(&path);
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not materialize illustration");
                self.push_notification(
                    "Could not decode the illustration.".to_string(),
                    NotificationLevel::Warning,
                );
            }
        }
    }

    fn open_diagram(&mut self) {
        let LessonState::Ready(lesson) = self.session.state() else {
            return;
        };
        match materialize_svg(&lesson.explanation.svg_diagram) {
            Ok(path) => {
                open_path(&path);
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not materialize diagram");
                self.push_notification(
                    "Could not write the diagram file.".to_string(),
                    NotificationLevel::Warning,
                );
            }
        }
    }

    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: 80,
        });
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_body(frame, chunks[1]);
        self.render_footer(frame, chunks[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let status = match self.session.state() {
            LessonState::Idle => String::new(),
            LessonState::Loading { topic } => format!("explaining: {topic}"),
            LessonState::Ready(lesson) => lesson.topic().to_string(),
            LessonState::Failed(_) => "error".to_string(),
        };

        let header = Paragraph::new(Line::from(vec![
            Span::styled(" SPIEGA ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled("AI-Powered Topic Explainer", theme::muted()),
            Span::raw("  "),
            Span::styled(status, theme::heading()),
        ]));
        frame.render_widget(header, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        match self.session.state() {
            LessonState::Idle => self.home.render(frame, area),
            LessonState::Loading { topic } => {
                let spinner = SPINNER_FRAMES[(self.ticks as usize) % SPINNER_FRAMES.len()];
                let lines = vec![
                    Line::raw(""),
                    Line::from(Span::styled(
                        format!("{spinner} Connecting nodes of knowledge…"),
                        theme::highlight(),
                    )),
                    Line::raw(""),
                    Line::from(Span::styled(format!("topic: {topic}"), theme::muted())),
                    Line::raw(""),
                    Line::from(Span::styled("Esc cancels", theme::dim())),
                ];
                frame.render_widget(
                    Paragraph::new(lines).alignment(Alignment::Center),
                    vertically_centered(area, 6),
                );
            }
            LessonState::Ready(lesson) => self.lesson_view.render(frame, area, lesson),
            LessonState::Failed(message) => {
                let lines = vec![
                    Line::from(Span::styled(
                        "Oops! Something went wrong.",
                        ratatui::style::Style::default().fg(theme::ERROR),
                    )),
                    Line::raw(""),
                    Line::from(Span::raw(message.clone())),
                    Line::raw(""),
                    Line::from(Span::styled("Enter retries · Esc goes home", theme::dim())),
                ];
                frame.render_widget(
                    Paragraph::new(lines).alignment(Alignment::Center),
                    vertically_centered(area, 5),
                );
            }
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        if let Some(notification) = self.notifications.last() {
            let color = match notification.level {
                NotificationLevel::Info => theme::INFO,
                NotificationLevel::Success => theme::SUCCESS,
                NotificationLevel::Warning => theme::WARNING,
                NotificationLevel::Error => theme::ERROR,
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!(" {}", notification.message),
                    ratatui::style::Style::default().fg(color),
                ))),
                area,
            );
            return;
        }

        let hints = match self.session.state() {
            LessonState::Idle => " type a topic · ↑/↓ samples · Enter explain · Esc quit",
            LessonState::Loading { .. } => " Esc cancel · Ctrl+C quit",
            LessonState::Ready(_) => {
                " j/k scroll · a answers · v video · p play · i image · d diagram · Esc home"
            }
            LessonState::Failed(_) => " Enter retry · Esc home · Ctrl+C quit",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hints, theme::key_hint()))),
            area,
        );
    }
}

fn vertically_centered(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let y = area.y + (area.height - height) / 2;
    Rect::new(area.x, y, area.width, height)
}
