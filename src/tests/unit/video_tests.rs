//! Video Poll Loop Tests
//!
//! Drives the poll state machine with scripted report sequences.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::core::gemini::video::{drive_polls, PollReport, VideoPollConfig};
use crate::core::gemini::{GeminiError, Result};

fn fast_config(max_attempts: u32) -> VideoPollConfig {
    VideoPollConfig {
        interval: Duration::ZERO,
        max_attempts,
    }
}

async fn drive_script(
    script: Vec<Result<PollReport>>,
    config: &VideoPollConfig,
) -> Result<String> {
    let script = RefCell::new(VecDeque::from(script));
    drive_polls(
        || {
            let report = script
                .borrow_mut()
                .pop_front()
                .expect("poll called more times than scripted");
            async move { report }
        },
        config,
    )
    .await
}

#[tokio::test]
async fn pending_pending_done_yields_handle() {
    let script = vec![
        Ok(PollReport::Pending),
        Ok(PollReport::Pending),
        Ok(PollReport::Done {
            uri: Some("https://dl.example.com/v.mp4".to_string()),
        }),
    ];
    let uri = drive_script(script, &fast_config(10)).await.unwrap();
    assert_eq!(uri, "https://dl.example.com/v.mp4");
}

#[tokio::test]
async fn done_without_reference_fails() {
    let script = vec![Ok(PollReport::Pending), Ok(PollReport::Done { uri: None })];
    let err = drive_script(script, &fast_config(10)).await.unwrap_err();
    assert!(matches!(err, GeminiError::MissingAsset));
}

#[tokio::test]
async fn poll_transport_error_is_terminal() {
    let script = vec![
        Ok(PollReport::Pending),
        Err(GeminiError::Api {
            status: 503,
            message: "unavailable".to_string(),
        }),
        // Never reached: the loop stops at the first poll failure.
        Ok(PollReport::Done {
            uri: Some("https://dl.example.com/v.mp4".to_string()),
        }),
    ];
    let err = drive_script(script, &fast_config(10)).await.unwrap_err();
    assert!(matches!(err, GeminiError::Api { status: 503, .. }));
}

#[tokio::test]
async fn attempt_ceiling_becomes_timeout() {
    let script = vec![Ok(PollReport::Pending), Ok(PollReport::Pending)];
    let err = drive_script(script, &fast_config(2)).await.unwrap_err();
    assert!(matches!(err, GeminiError::VideoTimeout { attempts: 2 }));
}

#[tokio::test]
async fn immediate_done_skips_pending() {
    let script = vec![Ok(PollReport::Done {
        uri: Some("https://dl.example.com/quick.mp4".to_string()),
    })];
    let uri = drive_script(script, &fast_config(1)).await.unwrap();
    assert_eq!(uri, "https://dl.example.com/quick.mp4");
}
