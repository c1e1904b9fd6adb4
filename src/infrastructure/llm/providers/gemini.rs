//! Gemini Provider - Google generative language API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::llm::{LLMConfig, LLMError, LLMMessage, LLMResponse, LLMResult, LLMUsage, Sampling, LLM};

/// Gemini provider
pub struct GeminiProvider {
    api_key: String,
    api_url: String,
    client: Client,
    model: String,
}

impl GeminiProvider {
    pub fn new(config: &LLMConfig) -> LLMResult<Self> {
        let api_key = config.api_key().ok_or(LLMError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LLMError::ConfigError(e.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            api_url: config.api_url.clone(),
            client,
            model: model_from_url(&config.api_url),
        })
    }
}

/// `.../models/gemini-pro:generateContent` -> `gemini-pro`
fn model_from_url(url: &str) -> String {
    url.split_once("/models/")
        .and_then(|(_, rest)| rest.split(':').next())
        .filter(|m| !m.is_empty() && !m.contains('/'))
        .unwrap_or("gemini")
        .to_string()
}

/// API request structure
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

/// API response structure
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

fn build_request(messages: Vec<LLMMessage>, sampling: Sampling) -> GenerateRequest {
    let mut system = Vec::new();
    let mut contents = Vec::new();

    for msg in messages {
        let part = Part { text: Some(msg.content) };
        match msg.role.as_str() {
            "system" => system.push(part),
            "assistant" => contents.push(Content { role: Some("model".to_string()), parts: vec![part] }),
            _ => contents.push(Content { role: Some("user".to_string()), parts: vec![part] }),
        }
    }

    GenerateRequest {
        contents,
        system_instruction: (!system.is_empty()).then(|| Content { role: None, parts: system }),
        generation_config: GenerationConfig {
            temperature: sampling.temperature,
            max_output_tokens: sampling.max_tokens,
            top_p: sampling.top_p,
            top_k: sampling.top_k,
        },
    }
}

/// First candidate's first text part
fn first_text(response: &GenerateResponse) -> Option<&str> {
    response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .first()?
        .text
        .as_deref()
}

#[async_trait]
impl LLM for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn chat(&self, messages: Vec<LLMMessage>, sampling: Sampling) -> LLMResult<LLMResponse> {
        let request = build_request(messages, sampling);

        let response = self.client
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error: {} - {}", status, body);
            return Err(LLMError::ApiError { status: status.as_u16(), body });
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ApiError { status: status.as_u16(), body: format!("malformed response: {}", e) })?;

        let content = first_text(&generated).ok_or(LLMError::NoText)?.to_string();

        let usage = generated.usage_metadata.as_ref().map(|u| LLMUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });
        let finish_reason = generated.candidates.first().and_then(|c| c.finish_reason.clone());

        Ok(LLMResponse {
            content,
            model: self.model.clone(),
            usage,
            finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::Mode;
    use crate::infrastructure::llm::LlmResponder;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn sampling() -> Sampling {
        Sampling { temperature: 0.7, max_tokens: 800, top_p: 0.95, top_k: 40 }
    }

    #[test]
    fn test_model_from_url() {
        assert_eq!(model_from_url(crate::infrastructure::llm::config::DEFAULT_API_URL), "gemini-pro");
        assert_eq!(model_from_url("http://localhost:9999/generate"), "gemini");
    }

    #[test]
    fn test_request_shape() {
        let request = build_request(
            vec![LLMMessage::system("Be brief."), LLMMessage::user("Hello")],
            sampling(),
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be brief.");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 800);
        assert_eq!(json["generationConfig"]["topK"], 40);
    }

    #[test]
    fn test_request_without_system_omits_instruction() {
        let request = build_request(vec![LLMMessage::user("Hi")], sampling());
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_none());
    }

    #[test]
    fn test_first_text_extraction() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Hello, sir."},{"text":"ignored"}],"role":"model"},"finishReason":"STOP"}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(first_text(&response), Some("Hello, sir."));
    }

    #[test]
    fn test_first_text_missing_fields() {
        for body in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{}]}}]}"#,
        ] {
            let response: GenerateResponse = serde_json::from_str(body).unwrap();
            assert_eq!(first_text(&response), None, "body: {}", body);
        }
    }

    #[test]
    fn test_new_requires_key() {
        let config = LLMConfig::default();
        assert!(matches!(GeminiProvider::new(&config), Err(LLMError::MissingApiKey)));
    }

    /// Serve canned generateContent responses on a local port
    async fn fake_api() -> String {
        let app = Router::new()
            .route(
                "/ok",
                post(|Query(params): Query<HashMap<String, String>>, Json(body): Json<Value>| async move {
                    let text = format!(
                        "{} (key={}, temperature={})",
                        body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default(),
                        params.get("key").map(String::as_str).unwrap_or_default(),
                        body["generationConfig"]["temperature"],
                    );
                    Json(json!({
                        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] }, "finishReason": "STOP" }],
                        "usageMetadata": { "promptTokenCount": 4, "candidatesTokenCount": 6, "totalTokenCount": 10 }
                    }))
                }),
            )
            .route("/forbidden", post(|| async { (StatusCode::FORBIDDEN, "API key not valid") }))
            .route("/malformed", post(|| async { "<html>not json</html>" }))
            .route("/blocked", post(|| async { Json(json!({ "candidates": [{ "finishReason": "SAFETY" }] })) }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}", addr)
    }

    fn provider_at(base: &str, path: &str) -> GeminiProvider {
        let config = LLMConfig {
            api_key: Some("test-key".to_string()),
            api_url: format!("{}{}", base, path),
            ..LLMConfig::default()
        };
        GeminiProvider::new(&config).unwrap()
    }

    fn responder_at(base: &str, path: &str) -> LlmResponder {
        LlmResponder::new(Some(Arc::new(provider_at(base, path))), LLMConfig::default(), Mode::Online)
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let base = fake_api().await;
        let sampling = Sampling { temperature: 0.5, ..sampling() };
        let response = provider_at(&base, "/ok")
            .chat(vec![LLMMessage::user("Hello")], sampling)
            .await
            .unwrap();

        assert_eq!(response.content, "Hello (key=test-key, temperature=0.5)");
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage.and_then(|u| u.total_tokens), Some(10));
    }

    #[tokio::test]
    async fn test_error_status_reply() {
        let base = fake_api().await;
        let err = provider_at(&base, "/forbidden")
            .chat(vec![LLMMessage::user("Hello")], sampling())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::ApiError { status: 403, ref body } if body == "API key not valid"));

        assert_eq!(
            responder_at(&base, "/forbidden").ask("Hello", 0.7).await,
            "I encountered an error while processing your request. Status code: 403"
        );
    }

    #[tokio::test]
    async fn test_malformed_success_body_reports_status() {
        let base = fake_api().await;
        let err = provider_at(&base, "/malformed")
            .chat(vec![LLMMessage::user("Hello")], sampling())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::ApiError { status: 200, .. }));

        assert_eq!(
            responder_at(&base, "/malformed").ask("Hello", 0.7).await,
            "I encountered an error while processing your request. Status code: 200"
        );
    }

    #[tokio::test]
    async fn test_missing_text_reply() {
        let base = fake_api().await;
        assert_eq!(
            responder_at(&base, "/blocked").ask("Hello", 0.7).await,
            "I received a response from Gemini, but couldn't extract the text. Please try again."
        );
    }

    #[tokio::test]
    #[ignore] // Requires GEMINI_API_KEY environment variable
    async fn test_gemini_chat() {
        let config = LLMConfig::from_env();
        let provider = GeminiProvider::new(&config).expect("GEMINI_API_KEY not set");

        let response = provider
            .chat(vec![LLMMessage::user("Say 'hello' in exactly one word.")], sampling())
            .await
            .expect("Chat request failed");

        assert!(!response.content.is_empty());
    }
}
