//! In-crate test suite.
//!
//! - `unit`: behavior tests for the aggregator, the Gemini client (against a
//!   wiremock server), and the video poll loop.
//! - `property`: proptest laws for the deduplication sub-algorithm.
//! - `common`: shared fixtures.

mod common;
mod property;
mod unit;
