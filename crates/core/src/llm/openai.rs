use crate::config::Settings;
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::{ChatCompletionClient, CompletionInput};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROVIDER: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o";
// Matches the stock client timeout of the hosted SDKs (10 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_openai_api_key()?.to_string();
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs = std::env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(api_key, base_url, model, Duration::from_secs(timeout_secs))
    }

    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    async fn create_completion(
        &self,
        req: ChatCompletionRequest,
    ) -> anyhow::Result<ChatCompletionResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );

        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );
        let res = self
            .http
            .post(url)
            .headers(headers)
            .json(&req)
            .send()
            .await
            .context("OpenAI request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read OpenAI response body")?;
        if !status.is_success() {
            return Err(LlmDiagnosticsError {
                provider: PROVIDER,
                stage: "http",
                detail: format!("status={status}"),
                raw_output: Some(text),
            }
            .into());
        }

        serde_json::from_str::<ChatCompletionResponse>(&text)
            .with_context(|| format!("failed to decode OpenAI response: {text}"))
    }
}

#[async_trait::async_trait]
impl ChatCompletionClient for OpenAiClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn complete_json(&self, input: CompletionInput) -> anyhow::Result<String> {
        let req = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: input.system,
                },
                Message {
                    role: "user",
                    content: input.user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let res = self.create_completion(req).await?;
        let Some(choice) = res.choices.into_iter().next() else {
            return Err(LlmDiagnosticsError {
                provider: PROVIDER,
                stage: "empty_choices",
                detail: "completion returned no choices".to_string(),
                raw_output: None,
            }
            .into());
        };

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    response_format: ResponseFormat,
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new("sk-test", server.uri(), "gpt-4o", Duration::from_secs(5)).unwrap()
    }

    fn input() -> CompletionInput {
        CompletionInput {
            system: "be strict".to_string(),
            user: "Please optimize my shopping list: rice".to_string(),
        }
    }

    #[tokio::test]
    async fn sends_json_mode_request_and_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o",
                "response_format": {"type": "json_object"},
                "messages": [
                    {"role": "system", "content": "be strict"},
                    {"role": "user", "content": "Please optimize my shopping list: rice"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "{\"summary\":\"ok\"}"}},
                    {"index": 1, "message": {"role": "assistant", "content": "{\"summary\":\"second\"}"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let content = client_for(&server).complete_json(input()).await.unwrap();
        assert_eq!(content, "{\"summary\":\"ok\"}");
    }

    #[tokio::test]
    async fn null_content_becomes_empty_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let content = client_for(&server).complete_json(input()).await.unwrap();
        assert_eq!(content, "");
    }

    #[tokio::test]
    async fn http_error_carries_diagnostics() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(json!({"error": {"message": "rate limited"}})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).complete_json(input()).await.unwrap_err();
        let diag = err.downcast_ref::<LlmDiagnosticsError>().unwrap();
        assert_eq!(diag.stage, "http");
        assert!(diag.raw_output.as_deref().unwrap().contains("rate limited"));
    }

    #[tokio::test]
    async fn no_choices_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).complete_json(input()).await.unwrap_err();
        let diag = err.downcast_ref::<LlmDiagnosticsError>().unwrap();
        assert_eq!(diag.stage, "empty_choices");
    }
}
