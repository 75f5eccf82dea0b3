//! Generation Client Errors

use thiserror::Error;

/// Errors produced by the generation client.
///
/// These are logged in full but never shown raw to the user; the UI only
/// ever surfaces generic messages (see the session layer).
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Video generation finished without a retrievable asset")]
    MissingAsset,

    #[error("Video generation timed out after {attempts} polls")]
    VideoTimeout { attempts: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GeminiError>;
