use crate::core::explain::CycleOutcome;
use crate::core::gemini::VideoHandle;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Periodic tick for the loading spinner and notification TTLs.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A lesson cycle settled. Applied only when `epoch` is still current.
    CycleSettled { epoch: u64, outcome: CycleOutcome },
    /// The on-demand video generation settled for the lesson of `epoch`.
    VideoSettled {
        epoch: u64,
        result: Result<VideoHandle, String>,
    },
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the footer.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}
