/// LLM Client: the single point of entry for chat-completion calls.
///
/// No other module talks to the provider directly. The summary service goes
/// through `SummaryBackend`, which this client implements.
///
/// Provider: Groq's OpenAI-compatible chat completions endpoint.
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

pub const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Hardcoded so every environment generates with the same model.
pub const MODEL: &str = "llama3-8b-8192";
const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.7;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const BACKOFF_BASE: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("no LLM API key configured")]
    NotConfigured,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Trimmed text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    backoff_base: Duration,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            endpoint: GROQ_API_URL.to_string(),
            backoff_base: BACKOFF_BASE,
        })
    }

    /// Points the client at another OpenAI-compatible endpoint.
    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[cfg(test)]
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Sends one chat completion and returns the full response.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let mut attempt = 0;

        loop {
            if attempt > 0 {
                // 1x, 2x, 4x the base delay
                let delay = self.backoff_base * (1 << (attempt - 1));
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "LLM call failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            attempt += 1;

            let retryable = match self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Err(e) => LlmError::Http(e),
                Ok(response) => {
                    let status = response.status();

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        warn!(
                            status = status.as_u16(),
                            body = %body,
                            "LLM API returned retryable status"
                        );
                        LlmError::Api {
                            status: status.as_u16(),
                            message: body,
                        }
                    } else if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        let message = serde_json::from_str::<ApiError>(&body)
                            .map(|e| e.error.message)
                            .unwrap_or(body);
                        return Err(LlmError::Api {
                            status: status.as_u16(),
                            message,
                        });
                    } else {
                        let chat: ChatResponse = response.json().await?;

                        if let Some(usage) = &chat.usage {
                            debug!(
                                prompt_tokens = usage.prompt_tokens,
                                completion_tokens = usage.completion_tokens,
                                "LLM call succeeded"
                            );
                        }

                        return Ok(chat);
                    }
                }
            };

            if attempt >= MAX_RETRIES {
                return Err(retryable);
            }
        }
    }

    /// Calls the model and returns its trimmed text.
    pub async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Serves a fake chat-completions endpoint that fails `failures` times with
    /// `failure_status` before answering.
    async fn spawn_fake_provider(
        failures: u32,
        failure_status: StatusCode,
    ) -> (String, Arc<AtomicU32>) {
        let hits = Arc::new(AtomicU32::new(0));

        let app = Router::new()
            .route(
                "/chat",
                post(
                    move |State(hits): State<Arc<AtomicU32>>, Json(body): Json<Value>| async move {
                        let n = hits.fetch_add(1, Ordering::SeqCst);
                        if n < failures {
                            return (failure_status, Json(json!({"error": {"message": "nope"}})));
                        }
                        assert_eq!(body["model"], MODEL);
                        assert_eq!(body["messages"][0]["role"], "system");
                        (
                            StatusCode::OK,
                            Json(json!({
                                "choices": [{
                                    "message": {"role": "assistant", "content": "  A summary.  "}
                                }],
                                "usage": {"prompt_tokens": 10, "completion_tokens": 3}
                            })),
                        )
                    },
                ),
            )
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/chat"), hits)
    }

    fn client(endpoint: &str) -> LlmClient {
        LlmClient::new("test-key".to_string())
            .unwrap()
            .with_endpoint(endpoint)
            .with_backoff_base(Duration::from_millis(1))
    }

    #[test]
    fn test_chat_response_text_trims_and_skips_empty() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "  hello \n"}}]
        }))
        .unwrap();
        assert_eq!(response.text(), Some("hello"));

        let empty: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "   "}}]
        }))
        .unwrap();
        assert_eq!(empty.text(), None);

        let none: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert_eq!(none.text(), None);
    }

    #[tokio::test]
    async fn test_complete_returns_trimmed_text() {
        let (endpoint, hits) = spawn_fake_provider(0, StatusCode::OK).await;
        let text = client(&endpoint).complete("prompt", "system").await.unwrap();

        assert_eq!(text, "A summary.");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_server_errors_then_succeeds() {
        let (endpoint, hits) = spawn_fake_provider(2, StatusCode::SERVICE_UNAVAILABLE).await;
        let text = client(&endpoint).complete("prompt", "system").await.unwrap();

        assert_eq!(text, "A summary.");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let (endpoint, hits) = spawn_fake_provider(10, StatusCode::TOO_MANY_REQUESTS).await;
        let err = client(&endpoint).complete("prompt", "system").await.unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 429, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), MAX_RETRIES);
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let (endpoint, hits) = spawn_fake_provider(10, StatusCode::UNAUTHORIZED).await;
        let err = client(&endpoint).complete("prompt", "system").await.unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "nope");
            }
            other => panic!("expected API error, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
