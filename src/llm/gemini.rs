use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{CompletionService, SafetySetting};
use crate::config::{LlmConfig, Secret};
use crate::constants;
use crate::error::LlmError;

/// Google Gemini `generateContent` over plain REST
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Secret,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    safety_settings: &'a [SafetySetting],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Secret, config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| constants::llm::DEFAULT_GEMINI_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url,
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated
    fn into_text(self) -> Result<String, LlmError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::EmptyResponse(format!("prompt blocked: {}", reason)));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::EmptyResponse("no candidates".to_string()))?;

        let finish_reason = candidate.finish_reason.unwrap_or_default();
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse(format!(
                "finish reason: {}",
                if finish_reason.is_empty() { "unknown" } else { finish_reason.as_str() }
            )));
        }
        Ok(text)
    }
}

#[async_trait]
impl CompletionService for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str, safety: &[SafetySetting]) -> Result<String, LlmError> {
        info!("🤖 Sending request to LLM (Model: {})...", self.model);

        let request = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
            safety_settings: safety,
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose())
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = resp.json().await?;
        debug!("Gemini raw response: {:?}", parsed);
        let text = parsed.into_text()?;

        info!("🤖 LLM Response received.");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::safety::PERMISSIVE;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeminiClient {
        let config = LlmConfig {
            base_url: Some(server.uri()),
            timeout_secs: 2,
            ..Default::default()
        };
        GeminiClient::new(Secret::new("test-key"), &config).unwrap()
    }

    fn text_response(parts: &[&str]) -> serde_json::Value {
        let parts: Vec<_> = parts.iter().map(|t| json!({"text": t})).collect();
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": parts},
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn test_complete_sends_prompt_key_and_safety() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash-lite:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "merhaba"}]}],
                "safetySettings": [
                    {"category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_NONE"},
                    {"category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_NONE"},
                    {"category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_NONE"},
                    {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_NONE"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&["cevap"])))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client_for(&server).complete("merhaba", &PERMISSIVE).await.unwrap();
        assert_eq!(answer, "cevap");
    }

    #[tokio::test]
    async fn test_parts_are_concatenated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(text_response(&["İstediğiniz ", "VIX"])),
            )
            .mount(&server)
            .await;

        let answer = client_for(&server).complete("q", &PERMISSIVE).await.unwrap();
        assert_eq!(answer, "İstediğiniz VIX");
    }

    #[tokio::test]
    async fn test_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("q", &PERMISSIVE).await.unwrap_err();
        assert!(matches!(err, LlmError::Http { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "OTHER"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).complete("q", &PERMISSIVE).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse(ref m) if m.contains("OTHER")));
    }

    #[test]
    fn test_candidate_without_text() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        let err = resp.into_text().unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse(ref m) if m.contains("SAFETY")));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = LlmConfig {
            base_url: Some("http://localhost:1234/".to_string()),
            model: "m".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new(Secret::new("k"), &config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/v1beta/models/m:generateContent"
        );
    }
}
