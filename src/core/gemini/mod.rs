//! Gemini Generation Client
//!
//! Wraps the Google Generative Language REST API for the four capabilities
//! the lesson cycle needs: structured explanation generation, illustrative
//! image generation, grounded resource lookup, and long-running video
//! generation with polling.
//!
//! The aggregator only ever sees the [`GenerationClient`] trait so tests can
//! substitute a scripted double.

pub mod client;
pub mod error;
pub mod video;

pub use client::GeminiClient;
pub use error::{GeminiError, Result};
pub use video::{PollReport, VideoHandle, VideoPhase, VideoPollConfig};

use async_trait::async_trait;

use crate::core::explain::types::{ExplanationData, ResourceKind, SearchResult};

/// The generation service as the aggregator consumes it.
///
/// Failure semantics mirror the provider contract: only the critical
/// explanation call and the user-initiated video call surface errors.
/// Image generation and resource lookup absorb their own failures and
/// report absence instead.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate the structured explanation payload. Critical: an error here
    /// invalidates the whole cycle.
    async fn generate_explanation(&self, topic: &str) -> Result<ExplanationData>;

    /// Generate an illustrative image as a data URI. Never errors; any
    /// internal failure yields `None`.
    async fn generate_image(&self, topic: &str) -> Option<String>;

    /// Look up related resources via search grounding. Never errors; any
    /// internal failure yields an empty list. Results are deduplicated and
    /// capped per kind.
    async fn find_resources(&self, topic: &str, kind: ResourceKind) -> Vec<SearchResult>;

    /// Generate a short summary video and materialize it locally.
    /// User-initiated and fallible; errors surface in the video panel only.
    async fn generate_video(&self, topic: &str) -> Result<VideoHandle>;
}
