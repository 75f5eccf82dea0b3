//! Gemini Client Tests
//!
//! Exercises request formatting, response parsing, and error mapping
//! against a local wiremock server.

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::GeminiConfig;
use crate::core::explain::ResourceKind;
use crate::core::gemini::{GeminiClient, GeminiError, GenerationClient, VideoPollConfig};
use crate::tests::common::{sample_explanation, sample_explanation_json};

const TEST_KEY: &str = "AIzaTestApiKey";

fn test_client(server: &MockServer, videos: &TempDir) -> GeminiClient {
    GeminiClient::new(
        TEST_KEY.to_string(),
        &GeminiConfig::default(),
        videos.path().to_path_buf(),
    )
    .with_base_url(server.uri())
    .with_poll_config(VideoPollConfig {
        interval: Duration::ZERO,
        max_attempts: 5,
    })
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }]
    }))
}

// =============================================================================
// Explanation
// =============================================================================

#[tokio::test]
async fn explanation_parses_structured_payload() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", TEST_KEY))
        .respond_with(text_response(&sample_explanation_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    let data = client.generate_explanation("Photosynthesis").await.unwrap();
    assert_eq!(data, sample_explanation());
}

#[tokio::test]
async fn explanation_with_missing_field_is_invalid() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    // Payload without quiz/relatedStats: all-or-nothing contract.
    let partial = json!({
        "topic": "X",
        "summary": "Y",
        "steps": [],
        "svgDiagram": "<svg/>",
        "conceptGraph": { "nodes": [], "links": [] }
    });
    Mock::given(method("POST"))
        .respond_with(text_response(&partial.to_string()))
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    let err = client.generate_explanation("X").await.unwrap_err();
    assert!(matches!(err, GeminiError::InvalidResponse(_)));
}

#[tokio::test]
async fn explanation_maps_api_status_errors() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    let err = client.generate_explanation("X").await.unwrap_err();
    match err {
        GeminiError::Api { status, message } => {
            assert_eq!(status, 429);
            assert!(message.contains("slow down"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn explanation_without_candidates_is_invalid() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    let err = client.generate_explanation("X").await.unwrap_err();
    assert!(matches!(err, GeminiError::InvalidResponse(_)));
}

// =============================================================================
// Image
// =============================================================================

#[tokio::test]
async fn image_becomes_data_uri() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash-image:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": { "mimeType": "image/png", "data": "QUJDRA==" }
                    }]
                }
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    let uri = client.generate_image("Photosynthesis").await;
    assert_eq!(uri.as_deref(), Some("data:image/png;base64,QUJDRA=="));
}

#[tokio::test]
async fn image_failure_is_absence_not_error() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    assert_eq!(client.generate_image("Photosynthesis").await, None);
}

// =============================================================================
// Grounded resources
// =============================================================================

#[tokio::test]
async fn resources_are_deduplicated_and_capped() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    let chunks: Vec<_> = (0..6)
        .map(|i| {
            // Two chunks per URL: dedup should halve them.
            json!({ "web": { "title": format!("Video {}", i / 2),
                             "uri": format!("https://youtube.com/watch?v={}", i / 2) } })
        })
        .collect();
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "grounded" }] },
                "groundingMetadata": { "groundingChunks": chunks }
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    let results = client
        .find_resources("Photosynthesis", ResourceKind::Video)
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].title, "Video 0");
    assert_eq!(results[1].url, "https://youtube.com/watch?v=1");
}

#[tokio::test]
async fn resources_skip_chunks_without_web_data() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "grounded" }] },
                "groundingMetadata": { "groundingChunks": [
                    { "retrievedContext": { "text": "not web" } },
                    { "web": { "uri": "https://example.com/only-uri" } },
                    { "web": { "title": "Good", "uri": "https://example.com/good" } }
                ] }
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    let results = client.find_resources("X", ResourceKind::Web).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Good");
}

#[tokio::test]
async fn resources_failure_is_empty_not_error() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    assert!(client.find_resources("X", ResourceKind::Web).await.is_empty());
}

// =============================================================================
// Video generation
// =============================================================================

#[tokio::test]
async fn video_submit_poll_download_roundtrip() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path(
            "/models/veo-3.1-fast-generate-preview:predictLongRunning",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "operations/op-video-1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let asset_uri = format!("{}/assets/clip.mp4?alt=media", server.uri());
    Mock::given(method("GET"))
        .and(path("/operations/op-video-1"))
        .and(header("x-goog-api-key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "operations/op-video-1",
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [{ "video": { "uri": asset_uri } }]
                }
            }
        })))
        .mount(&server)
        .await;

    // Download must carry the key as a query parameter.
    Mock::given(method("GET"))
        .and(path("/assets/clip.mp4"))
        .and(query_param("alt", "media"))
        .and(query_param("key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    let handle = client.generate_video("Photosynthesis").await.unwrap();

    assert!(handle.path.starts_with(videos.path()));
    assert_eq!(std::fs::read(&handle.path).unwrap(), b"mp4-bytes");
}

#[tokio::test]
async fn video_done_without_asset_fails() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "operations/op-video-2" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/operations/op-video-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "operations/op-video-2", "done": true })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    let err = client.generate_video("X").await.unwrap_err();
    assert!(matches!(err, GeminiError::MissingAsset));
}

#[tokio::test]
async fn video_never_done_times_out() {
    let server = MockServer::start().await;
    let videos = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "name": "operations/op-video-3" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/operations/op-video-3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "name": "operations/op-video-3", "done": false })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server, &videos);
    let err = client.generate_video("X").await.unwrap_err();
    assert!(matches!(err, GeminiError::VideoTimeout { attempts: 5 }));
}
