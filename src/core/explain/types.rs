//! Lesson Data Model
//!
//! Serde types for the structured explanation payload returned by the
//! generation service, plus the aggregate lesson/state types the TUI
//! consumes. Wire names are camelCase to match the response schema the
//! client sends with the generation request.

use serde::{Deserialize, Serialize};

// ============================================================================
// Explanation Payload
// ============================================================================

/// One step of the written breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationStep {
    pub title: String,
    pub description: String,
    /// A single glyph (usually an emoji) illustrating the step.
    pub icon: String,
}

/// A node in the concept graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptNode {
    pub id: String,
    pub group: i64,
}

/// A weighted link between two concept nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptLink {
    pub source: String,
    pub target: String,
    pub value: i64,
}

/// Related concepts and how they connect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptGraph {
    pub nodes: Vec<ConceptNode>,
    pub links: Vec<ConceptLink>,
}

/// A multiple-choice quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
}

/// One labeled data point of the related-statistics series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatPoint {
    pub label: String,
    pub value: f64,
}

/// The critical payload of a lesson cycle.
///
/// The generation contract is all-or-nothing: every field is required, so a
/// provider response missing any of them fails deserialization and the whole
/// cycle is treated as a critical failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationData {
    pub topic: String,
    pub summary: String,
    pub steps: Vec<ExplanationStep>,
    /// Raw self-contained `<svg>` markup describing the diagram.
    pub svg_diagram: String,
    pub concept_graph: ConceptGraph,
    pub quiz: Vec<QuizQuestion>,
    pub related_stats: Vec<StatPoint>,
}

// ============================================================================
// Search Resources
// ============================================================================

/// A grounded web or video resource: title plus URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Which kind of resource a grounded lookup should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Web,
    Video,
}

impl ResourceKind {
    /// Maximum number of results surfaced for this kind.
    pub fn cap(self) -> usize {
        match self {
            ResourceKind::Web => 5,
            ResourceKind::Video => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Web => "web",
            ResourceKind::Video => "video",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Aggregate Lesson
// ============================================================================

/// A fully assembled lesson: the critical explanation plus whichever
/// enhancing slots were filled by the cycle that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub explanation: ExplanationData,
    /// Data-URI-encoded illustrative image, when image generation succeeded.
    pub image: Option<String>,
    /// Related web articles (deduplicated, capped).
    pub web: Vec<SearchResult>,
    /// Related videos (deduplicated, capped).
    pub videos: Vec<SearchResult>,
}

impl Lesson {
    pub fn topic(&self) -> &str {
        &self.explanation.topic
    }
}
