//! Lesson Cycle Aggregation
//!
//! Issues the four generation requests for a topic concurrently, merges
//! their mixed outcomes into a single terminal state, and owns the
//! epoch-tagged state machine the UI treats as its single source of truth.
//!
//! Policy: the explanation is the product. If it fails, the whole cycle
//! fails and any enhancing results are discarded. Enhancing failures only
//! ever omit their own slot.

use crate::core::explain::types::{Lesson, ResourceKind};
use crate::core::gemini::GenerationClient;

/// Message shown for a failed cycle. The underlying cause is logged, never
/// surfaced, so transport/provider detail does not leak into the UI.
pub const CYCLE_FAILED_MESSAGE: &str =
    "Failed to generate explanation. Please check your connection and try again.";

// ============================================================================
// Cycle Execution
// ============================================================================

/// Terminal result of one lesson cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Ready(Box<Lesson>),
    Failed(String),
}

/// Run one full lesson cycle for a topic.
///
/// All four operations launch together and none can abort the others; the
/// merge only happens once every one of them has settled.
pub async fn run_cycle(client: &dyn GenerationClient, topic: &str) -> CycleOutcome {
    let (explanation, image, web, videos) = tokio::join!(
        client.generate_explanation(topic),
        client.generate_image(topic),
        client.find_resources(topic, ResourceKind::Web),
        client.find_resources(topic, ResourceKind::Video),
    );

    match explanation {
        Ok(explanation) => {
            tracing::info!(
                %topic,
                has_image = image.is_some(),
                web = web.len(),
                videos = videos.len(),
                "lesson cycle complete"
            );
            CycleOutcome::Ready(Box::new(Lesson {
                explanation,
                image,
                web,
                videos,
            }))
        }
        Err(e) => {
            tracing::error!(error = %e, %topic, "critical explanation generation failed");
            CycleOutcome::Failed(CYCLE_FAILED_MESSAGE.to_string())
        }
    }
}

// ============================================================================
// Session State Machine
// ============================================================================

/// The aggregate UI state. Exactly one variant is active at any time.
#[derive(Debug, Clone, PartialEq)]
pub enum LessonState {
    Idle,
    Loading { topic: String },
    Ready(Box<Lesson>),
    Failed(String),
}

impl LessonState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LessonState::Loading { .. })
    }
}

/// Epoch-tagged holder of the aggregate state.
///
/// Each submitted cycle gets a monotonically increasing epoch; a settled
/// outcome is applied only when its epoch still matches, so results from a
/// superseded cycle can never leak into a newer one.
#[derive(Debug)]
pub struct ExplainSession {
    epoch: u64,
    state: LessonState,
}

impl Default for ExplainSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplainSession {
    pub fn new() -> Self {
        Self {
            epoch: 0,
            state: LessonState::Idle,
        }
    }

    pub fn state(&self) -> &LessonState {
        &self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Begin a new cycle for `topic`.
    ///
    /// A topic that is empty after trimming is a no-op and returns `None`;
    /// no request must be issued in that case. Otherwise the session enters
    /// Loading, all prior lesson data is dropped, and the caller receives
    /// the epoch token plus the trimmed topic to run the cycle with.
    pub fn submit(&mut self, topic: &str) -> Option<(u64, String)> {
        let topic = topic.trim();
        if topic.is_empty() {
            return None;
        }

        self.epoch += 1;
        self.state = LessonState::Loading {
            topic: topic.to_string(),
        };
        Some((self.epoch, topic.to_string()))
    }

    /// Apply a settled cycle outcome.
    ///
    /// Returns `false` when the outcome belongs to a superseded epoch, in
    /// which case it is discarded and the current state is untouched.
    pub fn settle(&mut self, epoch: u64, outcome: CycleOutcome) -> bool {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "discarding stale cycle outcome");
            return false;
        }

        self.state = match outcome {
            CycleOutcome::Ready(lesson) => LessonState::Ready(lesson),
            CycleOutcome::Failed(message) => LessonState::Failed(message),
        };
        true
    }

    /// Return to Idle, clearing all lesson data.
    ///
    /// The epoch is bumped so anything still in flight settles into the
    /// void instead of resurrecting the old topic.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.state = LessonState::Idle;
    }
}
