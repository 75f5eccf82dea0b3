use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use miette::{IntoDiagnostic, Result, WrapErr};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use spiega::config::AppConfig;
use spiega::core::{logging, topic};
use spiega::tui::app::AppState;
use spiega::tui::services::Services;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (file only — the TUI owns the terminal)
    let _log_guard = logging::init_tui();
    log::info!("Spiega v{} starting", spiega::VERSION);

    let config = AppConfig::load();

    // An optional file argument seeds the topic input from its contents.
    let seeded = match std::env::args().nth(1) {
        Some(path) => Some(
            topic::seed_from_file(Path::new(&path))
                .into_diagnostic()
                .wrap_err_with(|| format!("could not read topic file {path}"))?,
        ),
        None => None,
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::init(config.clone(), event_tx.clone());
    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms.max(10));

    // Setup terminal
    enable_raw_mode().into_diagnostic()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).into_diagnostic()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).into_diagnostic()?;

    let mut app = AppState::new(event_rx, event_tx, services);
    if let Some(topic) = seeded {
        app.seed_topic(topic);
    }

    let result = app.run(&mut terminal, tick_rate).await;

    // Restore terminal
    disable_raw_mode().into_diagnostic()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).into_diagnostic()?;
    terminal.show_cursor().into_diagnostic()?;

    result.into_diagnostic()?;
    log::info!("Spiega exiting");
    Ok(())
}
