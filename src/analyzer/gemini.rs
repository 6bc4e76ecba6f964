//! Gemini API連携
//!
//! 画像解析（テキスト + inline画像）と要約/ランキング（テキストのみ）の両方を
//! `generateContent` で実行する。

use super::{SpeciesAnalyzer, Summarizer};
use crate::error::{RescueMatchError, Result};
use crate::image_payload::ImagePayload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout_seconds: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| RescueMatchError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            model,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// APIのベースURLを差し替える（プロキシ等）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// APIキーはURLに含めない（reqwestのエラー表示にURLが出るため）
    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Gemini API呼び出し（共通処理）
    async fn generate(&self, parts: Vec<Part>) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig { temperature: 0.2 },
        };

        let resp = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                RescueMatchError::AnalysisFailure(format!(
                    "Gemini request failed: {}",
                    e.without_url()
                ))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let preview: String = body.chars().take(300).collect();
            return Err(RescueMatchError::AnalysisFailure(format!(
                "Gemini API error {}: {}",
                status, preview
            )));
        }

        let response: GeminiResponse = resp.json().await.map_err(|e| {
            RescueMatchError::AnalysisFailure(format!("invalid Gemini response: {}", e.without_url()))
        })?;

        let text = extract_text(response)?;
        debug!(model = %self.model, chars = text.len(), "Gemini応答");
        Ok(text)
    }
}

/// 最初の候補のテキストパートを連結して返す
fn extract_text(response: GeminiResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(RescueMatchError::AnalysisFailure("Empty response from Gemini".into()));
    }
    Ok(text)
}

#[async_trait]
impl SpeciesAnalyzer for GeminiClient {
    async fn identify(&self, image: &ImagePayload, prompt: &str) -> Result<String> {
        let parts = vec![
            Part::Text {
                text: prompt.to_string(),
            },
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type().to_string(),
                    data: image.to_base64(),
                },
            },
        ];
        self.generate(parts).await
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        self.generate(vec![Part::Text {
            text: prompt.to_string(),
        }])
        .await
    }
}
