//! Video Generation Polling
//!
//! The one stateful protocol in the client: a long-running video generation
//! operation is submitted, polled at a fixed interval until the provider
//! reports completion, and the finished asset is downloaded to a local file.
//!
//! The poll loop is bounded by a maximum attempt count; exhausting it is a
//! terminal failure, not a silent hang.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use tokio::io::AsyncWriteExt;

use super::error::{GeminiError, Result};

// ============================================================================
// Configuration
// ============================================================================

/// Tuning for the video operation poll loop.
#[derive(Debug, Clone)]
pub struct VideoPollConfig {
    /// Fixed delay between status checks.
    pub interval: Duration,
    /// Maximum number of polls before the operation is declared timed out.
    pub max_attempts: u32,
}

impl Default for VideoPollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}

/// A locally playable video asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoHandle {
    pub path: PathBuf,
}

// ============================================================================
// State Machine
// ============================================================================

/// What one status poll reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollReport {
    /// Operation still running.
    Pending,
    /// Operation finished; `uri` is the retrievable asset reference, if any.
    Done { uri: Option<String> },
}

/// Lifecycle of a submitted video operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoPhase {
    /// Accepted by the provider, not yet polled.
    Submitted,
    /// At least one poll observed the operation incomplete.
    Pending,
    /// Finished with a retrievable asset reference.
    Done(String),
    /// Finished without a usable asset reference.
    Failed,
}

impl VideoPhase {
    /// Apply one poll report to the current phase.
    pub fn advance(self, report: PollReport) -> VideoPhase {
        match report {
            PollReport::Pending => VideoPhase::Pending,
            PollReport::Done { uri: Some(uri) } => VideoPhase::Done(uri),
            PollReport::Done { uri: None } => VideoPhase::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoPhase::Done(_) | VideoPhase::Failed)
    }
}

/// Drive a submitted operation to a terminal phase.
///
/// `poll` is called once per attempt after the configured interval elapses.
/// A poll transport error is itself terminal: the operation is reported
/// failed and no partial asset is ever returned.
pub async fn drive_polls<P, Fut>(mut poll: P, config: &VideoPollConfig) -> Result<String>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<PollReport>>,
{
    let mut phase = VideoPhase::Submitted;

    for attempt in 1..=config.max_attempts {
        if !config.interval.is_zero() {
            tokio::time::sleep(config.interval).await;
        }

        let report = poll().await?;
        tracing::debug!(attempt, ?report, "video operation poll");
        phase = phase.advance(report);

        match phase {
            VideoPhase::Done(uri) => return Ok(uri),
            VideoPhase::Failed => return Err(GeminiError::MissingAsset),
            _ => {}
        }
    }

    Err(GeminiError::VideoTimeout {
        attempts: config.max_attempts,
    })
}

// ============================================================================
// Asset Download
// ============================================================================

/// Append the API key to an asset reference URL.
///
/// The provider hands back a download URI that must be fetched with the same
/// key the operation was submitted with.
pub(crate) fn authenticated_uri(uri: &str, api_key: &str) -> String {
    let sep = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{sep}key={api_key}")
}

/// Stream the finished asset into `dir` and return its local handle.
pub(crate) async fn download_asset(
    client: &reqwest::Client,
    uri: &str,
    api_key: &str,
    dir: &std::path::Path,
) -> Result<VideoHandle> {
    tokio::fs::create_dir_all(dir).await?;

    let response = client.get(authenticated_uri(uri, api_key)).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(GeminiError::Api {
            status: status.as_u16(),
            message: "failed to download video bytes".to_string(),
        });
    }

    let tmp = tempfile::Builder::new()
        .prefix("veo-")
        .suffix(".mp4")
        .tempfile_in(dir)?;
    let (_, path) = tmp.keep().map_err(|e| GeminiError::Io(e.error))?;

    let mut file = tokio::fs::File::create(&path).await?;
    let mut stream = response.bytes_stream();

    use futures_util::StreamExt;
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;

    tracing::info!(path = ?path, "video asset downloaded");
    Ok(VideoHandle { path })
}
