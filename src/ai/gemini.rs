//! Google Gemini API Client
//!
//! `generateContent` over plain HTTPS. One prompt in, the concatenated text
//! of the first candidate out.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{AiConfig, AiError, AiResult, LlmClient};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: AiConfig,
    client: Client,
    base_url: String,
}

/// Gemini API request format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: AiConfig) -> AiResult<Self> {
        Self::with_base_url(config, BASE_URL)
    }

    /// Create a client pointed at a different endpoint (proxies, test servers)
    pub fn with_base_url(config: AiConfig, base_url: &str) -> AiResult<Self> {
        if !config.has_api_key() {
            return Err(AiError::MissingApiKey);
        }

        // The GenerationClient owns the per-call deadline; this one only
        // stops a wedged connection from living forever.
        let client = Client::builder()
            .timeout(config.timeout() * 2)
            .build()?;

        Ok(Self {
            config,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request_body(&self, prompt: &str) -> GeminiRequest {
        let generation_config = if self.config.temperature.is_some() || self.config.max_tokens.is_some()
        {
            Some(GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            })
        } else {
            None
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config,
        }
    }

    async fn send_request(&self, prompt: &str) -> AiResult<String> {
        let url = format!("{}/{}:generateContent", self.base_url, self.config.model);
        debug!("Sending request to Gemini API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Gemini API error: {} - {}", status, response_text);
            return Err(AiError::Api {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&response_text)?;

        if let Some(usage) = &gemini_response.usage_metadata {
            info!(
                "Gemini API usage - Prompt: {:?} tokens, Response: {:?} tokens, Total: {:?} tokens",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        extract_text(gemini_response)
    }
}

/// Join every text part of the first candidate
fn extract_text(response: GeminiResponse) -> AiResult<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AiError::InvalidResponse("No candidates in response".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AiError::InvalidResponse(format!(
            "Empty candidate (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> AiResult<String> {
        self.send_request(prompt).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> AiConfig {
        AiConfig {
            api_key: "test-key".to_string(),
            ..AiConfig::default()
        }
    }

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new(create_test_config()).unwrap();
        assert_eq!(client.model_name(), crate::ai::DEFAULT_MODEL);
        assert_eq!(client.provider_name(), "Gemini");
    }

    #[test]
    fn test_gemini_client_empty_api_key() {
        let client = GeminiClient::new(AiConfig::default());
        assert!(matches!(client.err(), Some(AiError::MissingApiKey)));
    }

    #[test]
    fn test_request_body_shape() {
        let mut config = create_test_config();
        config.temperature = Some(0.2);
        config.max_tokens = Some(256);
        let client = GeminiClient::new(config).unwrap();

        let body = serde_json::to_value(client.request_body("Hello")).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
    }

    #[test]
    fn test_request_body_omits_empty_generation_config() {
        let client = GeminiClient::new(create_test_config()).unwrap();
        let body = serde_json::to_value(client.request_body("Hello")).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "Thanks for "}, {"text": "the review."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "totalTokenCount": 20}
        }"#;
        let response: GeminiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            response.usage_metadata.as_ref().unwrap().prompt_token_count,
            Some(12)
        );
        assert_eq!(extract_text(response).unwrap(), "Thanks for the review.");
    }

    #[test]
    fn test_extract_text_no_candidates() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            extract_text(response),
            Err(AiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_extract_text_blocked_candidate() {
        let response: GeminiResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        let err = extract_text(response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    // Integration test - requires API key
    #[tokio::test]
    #[ignore = "Requires GEMINI_API_KEY environment variable"]
    async fn test_gemini_integration() {
        let config = AiConfig::from_env().unwrap();
        let client = GeminiClient::new(config).unwrap();
        let text = client
            .generate("Reply with the single word: ready")
            .await
            .unwrap();
        assert!(!text.trim().is_empty());
    }
}
