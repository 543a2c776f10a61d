//! Gemini REST implementation of the completion backend
//!
//! One `generateContent` call per completion, with search grounding enabled
//! so the model can pull live prices and recent news. Citations come from
//! the grounding metadata on the first candidate.

use async_trait::async_trait;
use common::GenerationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{Citation, Completion, CompletionBackend};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// HTTP client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    tools: Vec<Tool>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default, rename = "groundingMetadata")]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(default, rename = "groundingChunks")]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    #[serde(default)]
    title: String,
    #[serde(default)]
    uri: Option<String>,
}

impl GenerateResponse {
    fn into_completion(mut self) -> Completion {
        if self.candidates.is_empty() {
            return Completion::default();
        }
        let candidate = self.candidates.remove(0);

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let citations = candidate
            .grounding_metadata
            .map(|m| {
                m.grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .map(|web| Citation {
                        title: web.title,
                        uri: web.uri,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Completion { text, citations }
    }
}

#[async_trait]
impl CompletionBackend for GeminiClient {
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<Completion, GenerationError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: vec![Tool {
                google_search: serde_json::Map::new(),
            }],
            generation_config: GenerationConfig { temperature },
        };

        debug!(model = %self.config.model, temperature, "sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Backend(e.to_string()))?
            .error_for_status()
            .map_err(|e| GenerationError::Backend(e.to_string()))?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Backend(e.to_string()))?;

        Ok(parsed.into_completion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grounded_response() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "prefix "}, {"text": "{\"type\":\"LONG\"}"}]},
                "groundingMetadata": {
                    "groundingChunks": [
                        {"web": {"title": "CoinDesk", "uri": "https://coindesk.com/x"}},
                        {"web": {"title": "No Link"}},
                        {}
                    ]
                }
            }]
        }"#;

        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        let completion = response.into_completion();
        assert_eq!(completion.text, "prefix {\"type\":\"LONG\"}");
        assert_eq!(completion.citations.len(), 2);
        assert_eq!(completion.citations[0].title, "CoinDesk");
        assert_eq!(completion.citations[1].uri, None);
    }

    #[test]
    fn empty_candidates_yield_empty_completion() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        let completion = response.into_completion();
        assert!(completion.text.is_empty());
        assert!(completion.citations.is_empty());
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new(GeminiConfig::new("k"));
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
