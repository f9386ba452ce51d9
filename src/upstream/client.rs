use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::UpstreamError;

/// Default OpenAI-compatible completion endpoint.
pub const DEFAULT_COMPLETION_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Default hosted model.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
/// Default hard timeout for a single completion request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// One chat completion: a system instruction plus one user message.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Chat-completion backend abstraction (allows mocking).
pub trait CompletionClient: Send + Sync {
    /// Model identifier sent upstream.
    fn model(&self) -> &str;

    /// Perform a single completion and return the assistant text.
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, UpstreamError>;
}

/// Blocking client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// One request per call, no retries. The timeout covers connect + body.
pub struct ChatCompletionClient {
    url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl ChatCompletionClient {
    pub fn new(
        url: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, UpstreamError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(5)))
            .build()
            .map_err(|e| UpstreamError::HttpClient(e.to_string()))?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl CompletionClient for ChatCompletionClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, UpstreamError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    UpstreamError::Connection(self.url.clone())
                } else {
                    UpstreamError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| UpstreamError::JsonParsing(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(UpstreamError::EmptyCompletion)
    }
}

/// Mock completion client for testing — returns a configurable reply.
#[cfg(test)]
pub struct MockCompletionClient {
    reply: Result<String, String>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockCompletionClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// A client whose every call fails as if the host were unreachable.
    pub fn failing() -> Self {
        Self {
            reply: Err("mock://unreachable".to_string()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl CompletionClient for MockCompletionClient {
    fn model(&self) -> &str {
        "mock-model"
    }

    fn complete(&self, _request: &CompletionRequest<'_>) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(url) => Err(UpstreamError::Connection(url.clone())),
        }
    }
}
