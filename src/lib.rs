/// Spiega - AI-Powered Topic Explainer (TUI Edition)
///
/// Core library providing the lesson aggregation core, the Gemini
/// generation client, and the ratatui presentation layer.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
