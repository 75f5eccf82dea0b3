//! Gemini REST Client (API Key-based)
//!
//! Talks to Google's Generative Language API with an API key. One client
//! instance serves all four generation capabilities; it is cheap to clone
//! the inner `reqwest::Client` and the instance holds no request state.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::GeminiConfig;
use crate::core::explain::dedup::dedup_resources;
use crate::core::explain::types::{ExplanationData, ResourceKind, SearchResult};

use super::error::{GeminiError, Result};
use super::video::{self, PollReport, VideoHandle, VideoPollConfig};
use super::GenerationClient;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// System instruction for the structured explanation call.
const SYSTEM_INSTRUCTION: &str = "\
You are an expert teacher who explains complex topics simply, step by step, \
for a general audience. You think visually. When asked to explain a topic you \
must return a JSON object. Include a simple, clean, illustrative SVG string \
that shows the core mechanism of the topic, without markdown fencing. Include \
a list of related concepts and their connections for a force-directed graph. \
Include a few real or hypothetical statistical data points related to the \
topic, suitable for a chart.";

/// Gemini client over the Generative Language REST API.
pub struct GeminiClient {
    api_key: String,
    text_model: String,
    image_model: String,
    video_model: String,
    base_url: String,
    poll: VideoPollConfig,
    video_dir: PathBuf,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: String, config: &GeminiConfig, video_dir: PathBuf) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to create HTTP client");

        // Trim the key at construction so header auth and the download query
        // parameter always agree.
        Self {
            api_key: api_key.trim().to_string(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
            video_model: config.video_model.clone(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll: VideoPollConfig {
                interval: Duration::from_secs(config.poll_interval_secs),
                max_attempts: config.poll_max_attempts,
            },
            video_dir,
            client,
        }
    }

    /// Override the API base URL (tests point this at a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the poll loop tuning.
    pub fn with_poll_config(mut self, poll: VideoPollConfig) -> Self {
        self.poll = poll;
        self
    }

    // ── Request plumbing ────────────────────────────────────────────────

    fn model_url(&self, model: &str, action: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, action)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Pull the first candidate's first text part out of a response.
    fn first_text(response: &Value) -> Result<&str> {
        response["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
            .and_then(|parts| parts.first())
            .and_then(|p| p["text"].as_str())
            .ok_or_else(|| GeminiError::InvalidResponse("Missing content".to_string()))
    }

    // ── Capability internals ────────────────────────────────────────────

    async fn request_explanation(&self, topic: &str) -> Result<ExplanationData> {
        let url = self.model_url(&self.text_model, "generateContent");
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": format!("Explain the topic: \"{topic}\"") }]
            }],
            "systemInstruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": explanation_schema(),
            }
        });

        let response = self.post_json(&url, &body).await?;
        let text = Self::first_text(&response)?;

        serde_json::from_str(text)
            .map_err(|e| GeminiError::InvalidResponse(format!("explanation payload: {e}")))
    }

    async fn request_image(&self, topic: &str) -> Result<String> {
        let url = self.model_url(&self.image_model, "generateContent");
        let prompt = format!(
            "Create a high-quality, educational illustration explaining: \"{topic}\". \
             The style should be modern, clean, and suitable for a textbook or documentary."
        );
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseModalities": ["IMAGE"],
            }
        });

        let response = self.post_json(&url, &body).await?;

        let parts = response["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["content"]["parts"].as_array())
            .ok_or_else(|| GeminiError::InvalidResponse("Missing image parts".to_string()))?;

        for part in parts {
            let inline = &part["inlineData"];
            if let (Some(mime), Some(data)) = (inline["mimeType"].as_str(), inline["data"].as_str())
            {
                return Ok(format!("data:{mime};base64,{data}"));
            }
        }

        Err(GeminiError::InvalidResponse(
            "No inline image in response".to_string(),
        ))
    }

    async fn request_resources(&self, topic: &str, kind: ResourceKind) -> Result<Vec<SearchResult>> {
        let url = self.model_url(&self.text_model, "generateContent");
        let prompt = match kind {
            ResourceKind::Video => format!(
                "Find 3 distinct, high-quality educational YouTube videos specifically about \
                 \"{topic}\". Return the video titles and URLs."
            ),
            ResourceKind::Web => format!(
                "Find 5 high-quality, educational web resources (articles, documentation, or \
                 tutorials) about \"{topic}\". Do not include videos."
            ),
        };
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "tools": [{ "googleSearch": {} }],
        });

        let response = self.post_json(&url, &body).await?;

        let chunks = response["candidates"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|c| c["groundingMetadata"]["groundingChunks"].as_array())
            .cloned()
            .unwrap_or_default();

        let candidates = chunks
            .iter()
            .filter_map(|chunk| {
                let web = &chunk["web"];
                match (web["title"].as_str(), web["uri"].as_str()) {
                    (Some(title), Some(uri)) => Some(SearchResult::new(title, uri)),
                    _ => None,
                }
            })
            .collect();

        Ok(dedup_resources(candidates, kind.cap()))
    }

    async fn request_video(&self, topic: &str) -> Result<VideoHandle> {
        let url = self.model_url(&self.video_model, "predictLongRunning");
        let prompt = format!(
            "Cinematic, educational, abstract visualization explaining: {topic}. \
             Clear, scientific, high definition, 720p."
        );
        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "aspectRatio": "16:9",
                "resolution": "720p",
            }
        });

        let submitted = self.post_json(&url, &body).await?;
        let operation = submitted["name"]
            .as_str()
            .ok_or_else(|| GeminiError::InvalidResponse("Missing operation name".to_string()))?
            .to_string();
        tracing::info!(%operation, "video generation submitted");

        let operation_url = format!("{}/{}", self.base_url, operation);
        let uri = video::drive_polls(
            || {
                let url = operation_url.clone();
                async move {
                    let status = self.get_json(&url).await?;
                    Ok(parse_operation(&status))
                }
            },
            &self.poll,
        )
        .await?;

        video::download_asset(&self.client, &uri, &self.api_key, &self.video_dir).await
    }
}

/// Read a long-running-operation status body into a poll report.
fn parse_operation(status: &Value) -> PollReport {
    if !status["done"].as_bool().unwrap_or(false) {
        return PollReport::Pending;
    }

    let uri = status["response"]["generateVideoResponse"]["generatedSamples"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|sample| sample["video"]["uri"].as_str())
        .map(|s| s.to_string());

    PollReport::Done { uri }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate_explanation(&self, topic: &str) -> Result<ExplanationData> {
        self.request_explanation(topic).await
    }

    async fn generate_image(&self, topic: &str) -> Option<String> {
        match self.request_image(topic).await {
            Ok(data_uri) => Some(data_uri),
            Err(e) => {
                tracing::warn!(error = %e, "image generation failed; omitting illustration");
                None
            }
        }
    }

    async fn find_resources(&self, topic: &str, kind: ResourceKind) -> Vec<SearchResult> {
        match self.request_resources(topic, kind).await {
            Ok(resources) => resources,
            Err(e) => {
                tracing::warn!(error = %e, kind = %kind, "resource lookup failed; omitting list");
                Vec::new()
            }
        }
    }

    async fn generate_video(&self, topic: &str) -> Result<VideoHandle> {
        self.request_video(topic).await
    }
}

/// Response schema for the structured explanation call.
///
/// Field names here are the wire contract the serde types in
/// `core::explain::types` deserialize against.
fn explanation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topic": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "steps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "icon": {
                            "type": "STRING",
                            "description": "A single emoji representing this step"
                        },
                    },
                    "required": ["title", "description", "icon"],
                },
            },
            "svgDiagram": {
                "type": "STRING",
                "description": "A valid, self-contained <svg> string illustrating the concept. \
                                Use a viewBox, usually 0 0 800 600. Use flat, modern colors. \
                                Ensure text is readable.",
            },
            "conceptGraph": {
                "type": "OBJECT",
                "properties": {
                    "nodes": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "id": { "type": "STRING" },
                                "group": { "type": "INTEGER" },
                            },
                            "required": ["id", "group"],
                        },
                    },
                    "links": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "source": { "type": "STRING" },
                                "target": { "type": "STRING" },
                                "value": { "type": "INTEGER" },
                            },
                            "required": ["source", "target", "value"],
                        },
                    },
                },
                "required": ["nodes", "links"],
            },
            "quiz": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": { "type": "STRING" },
                        "options": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                        },
                        "correctOptionIndex": { "type": "INTEGER" },
                    },
                    "required": ["question", "options", "correctOptionIndex"],
                },
            },
            "relatedStats": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "label": { "type": "STRING" },
                        "value": { "type": "NUMBER" },
                    },
                    "required": ["label", "value"],
                },
            },
        },
        "required": [
            "topic", "summary", "steps", "svgDiagram",
            "conceptGraph", "quiz", "relatedStats"
        ],
    })
}
