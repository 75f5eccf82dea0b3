//! Lesson Cycle Aggregation Tests
//!
//! The merge policy under every mix of critical/enhancing outcomes: a
//! critical failure always loses everything, a critical success keeps the
//! explanation verbatim and whichever enhancements arrived.

use rstest::rstest;

use crate::core::explain::{
    run_cycle, CycleOutcome, ResourceKind, SearchResult, CYCLE_FAILED_MESSAGE,
};
use crate::core::gemini::{GeminiError, MockGenerationClient};
use crate::tests::common::sample_explanation;

fn web_results() -> Vec<SearchResult> {
    vec![SearchResult::new("Intro", "https://example.com/intro")]
}

fn video_results() -> Vec<SearchResult> {
    vec![SearchResult::new("Lecture", "https://youtube.com/watch?v=1")]
}

/// A client whose four operations are scripted by flags.
fn scripted_client(
    explanation_ok: bool,
    image_ok: bool,
    web_ok: bool,
    videos_ok: bool,
) -> MockGenerationClient {
    let mut client = MockGenerationClient::new();

    client.expect_generate_explanation().returning(move |_| {
        if explanation_ok {
            Ok(sample_explanation())
        } else {
            Err(GeminiError::Api {
                status: 500,
                message: "provider exploded".to_string(),
            })
        }
    });
    client
        .expect_generate_image()
        .returning(move |_| image_ok.then(|| "data:image/png;base64,QUJD".to_string()));
    client.expect_find_resources().returning(move |_, kind| {
        let ok = match kind {
            ResourceKind::Web => web_ok,
            ResourceKind::Video => videos_ok,
        };
        if !ok {
            return Vec::new();
        }
        match kind {
            ResourceKind::Web => web_results(),
            ResourceKind::Video => video_results(),
        }
    });

    client
}

#[rstest]
#[case(false, false, false)]
#[case(true, false, false)]
#[case(false, true, false)]
#[case(false, false, true)]
#[case(true, true, false)]
#[case(true, false, true)]
#[case(false, true, true)]
#[case(true, true, true)]
#[tokio::test]
async fn critical_failure_discards_all_enhancements(
    #[case] image_ok: bool,
    #[case] web_ok: bool,
    #[case] videos_ok: bool,
) {
    let client = scripted_client(false, image_ok, web_ok, videos_ok);
    let outcome = run_cycle(&client, "Photosynthesis").await;
    assert_eq!(outcome, CycleOutcome::Failed(CYCLE_FAILED_MESSAGE.to_string()));
}

#[rstest]
#[case(false, false, false)]
#[case(true, false, true)]
#[case(true, true, true)]
#[tokio::test]
async fn critical_success_keeps_explanation_verbatim(
    #[case] image_ok: bool,
    #[case] web_ok: bool,
    #[case] videos_ok: bool,
) {
    let client = scripted_client(true, image_ok, web_ok, videos_ok);
    let outcome = run_cycle(&client, "Photosynthesis").await;

    let CycleOutcome::Ready(lesson) = outcome else {
        panic!("expected Ready, got {outcome:?}");
    };
    assert_eq!(lesson.explanation, sample_explanation());
    assert_eq!(lesson.image.is_some(), image_ok);
    assert_eq!(lesson.web, if web_ok { web_results() } else { Vec::new() });
    assert_eq!(
        lesson.videos,
        if videos_ok { video_results() } else { Vec::new() }
    );
}

#[tokio::test]
async fn failure_message_never_leaks_provider_detail() {
    let client = scripted_client(false, true, true, true);
    let outcome = run_cycle(&client, "Photosynthesis").await;
    let CycleOutcome::Failed(message) = outcome else {
        panic!("expected Failed");
    };
    assert!(!message.contains("provider exploded"));
    assert!(!message.contains("500"));
}
