use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::gemini::{GeminiClient, GenerationClient};

use super::events::AppEvent;

/// Centralized handle to backend services.
///
/// Created once at startup, then borrowed by the app state. The generation
/// client is behind the trait object so tests can swap in a double; it is
/// absent when no API key is configured, in which case submitting a topic
/// only produces a notification.
pub struct Services {
    pub client: Option<Arc<dyn GenerationClient>>,
    pub config: AppConfig,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    pub fn init(config: AppConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let client = match config.api_key() {
            Some(key) => {
                let gemini = GeminiClient::new(key, &config.gemini, config.videos_dir());
                Some(Arc::new(gemini) as Arc<dyn GenerationClient>)
            }
            None => {
                log::warn!(
                    "No API key configured; set GEMINI_API_KEY or gemini.api_key in config.toml"
                );
                None
            }
        };

        Self {
            client,
            config,
            event_tx,
        }
    }
}
