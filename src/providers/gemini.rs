//! Google Gemini provider (`generateContent` REST API).
//!
//! Key resolution: explicit key from config, then `GEMINI_API_KEY`, then
//! `GOOGLE_API_KEY`. The HTTP client carries bounded timeouts so a hung
//! upstream can never stall a conversation past the request deadline.

use crate::config::GenerationConfig;
use crate::providers::traits::{ChatMessage, Provider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    generation: GenerationConfig,
    client: Client,
}

// ── API request/response types ───────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: WireGenerationConfig,
    #[serde(rename = "safetySettings")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct WireGenerationConfig {
    temperature: f64,
    #[serde(rename = "topP")]
    top_p: f64,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

fn default_safety_settings() -> Vec<SafetySetting> {
    const THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: THRESHOLD,
    })
    .collect()
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<&str>, generation: &GenerationConfig) -> Self {
        Self::with_base_url(api_key, generation, DEFAULT_BASE_URL)
    }

    /// Point the provider at a different endpoint. Tests use this to target a
    /// local mock server.
    pub fn with_base_url(
        api_key: Option<&str>,
        generation: &GenerationConfig,
        base_url: &str,
    ) -> Self {
        let resolved_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok());

        Self {
            api_key: resolved_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            generation: generation.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(generation.request_timeout_secs))
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn chat_with_history(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "Gemini API key not found. Set GEMINI_API_KEY (or GOOGLE_API_KEY), \
                 or put api_key in ~/.civicbot/config.toml. \
                 Keys: https://aistudio.google.com/app/apikey"
            )
        })?;

        let contents = messages
            .iter()
            .map(|m| Content {
                role: m.role.clone(),
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
            .collect();

        let request = GenerateContentRequest {
            contents,
            generation_config: WireGenerationConfig {
                temperature,
                top_p: self.generation.top_p,
                top_k: self.generation.top_k,
                max_output_tokens: self.generation.max_output_tokens,
            },
            safety_settings: default_safety_settings(),
        };

        // Model format: gemini-2.0-flash, gemini-1.5-pro, etc.
        let model_name = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };

        let url = format!(
            "{}/{model_name}:generateContent?key={api_key}",
            self.base_url
        );

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(super::api_error("Gemini", response).await);
        }

        let result: GenerateContentResponse = response.json().await?;

        if let Some(err) = result.error {
            anyhow::bail!("Gemini API error: {}", err.message);
        }

        // A 200 with no text is a valid-but-empty generation; the caller
        // decides how to substitute for it.
        Ok(result
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default())
    }
}
