//! Lesson Aggregation Module
//!
//! The core of the application: data model for generated lessons, the
//! resource deduplication sub-algorithm, and the epoch-tagged cycle
//! aggregator that turns four concurrent generation requests into one
//! coherent terminal state.

pub mod dedup;
pub mod session;
pub mod types;

pub use dedup::dedup_resources;
pub use session::{
    run_cycle, CycleOutcome, ExplainSession, LessonState, CYCLE_FAILED_MESSAGE,
};
pub use types::{
    ConceptGraph, ConceptLink, ConceptNode, ExplanationData, ExplanationStep, Lesson,
    QuizQuestion, ResourceKind, SearchResult, StatPoint,
};
