//! OpenRouter chat-completion client.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderError;

/// Production API base. Tests point [`OpenRouterClient::with_base_url`] at a
/// mock server instead.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Substring marking a free-tier model identifier. Inherited naming
/// convention; cost reporting is suppressed for matching models.
pub const FREE_TIER_MARKER: &str = ":free";

/// Whether the model identifier denotes a free-tier model.
pub fn is_free_model(model: &str) -> bool {
    model.contains(FREE_TIER_MARKER)
}

/// A generated commit message with optional usage accounting.
#[derive(Debug, Clone)]
pub struct Completion {
    /// The suggested message, trimmed.
    pub message: String,
    pub usage: Option<Usage>,
}

/// Usage accounting reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Usage {
    pub total_tokens: u64,
    /// Authoritative cost in USD when the provider reports one.
    pub cost: Option<f64>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    usage: UsageInclude,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenRouter accounting opt-in: `"usage": {"include": true}`.
#[derive(Serialize)]
struct UsageInclude {
    include: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    content: String,
}

#[derive(Deserialize)]
struct WireUsage {
    total_tokens: Option<u64>,
    /// OpenRouter-specific extension; authoritative over anything derived
    /// from the generic token fields.
    cost: Option<f64>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// HTTP client for the chat-completions endpoint.
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Client against a custom base URL, for tests.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Perform a single chat-completion request and return the trimmed
    /// message plus any usage accounting the provider supplied.
    ///
    /// No retries: a transport or API failure propagates with the
    /// provider's own message preserved.
    pub async fn complete(
        &self,
        model: &str,
        system: &str,
        user: &str,
    ) -> Result<Completion, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            usage: UsageInclude { include: true },
        };

        debug!("Requesting completion from {url} with model {model}");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://github.com/jacksnxly/epigram")
            .header("X-Title", "epigram")
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: extract_api_error(&body),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(ProviderError::MalformedResponse)?;

        let usage = parsed.usage.map(|u| Usage {
            total_tokens: u.total_tokens.unwrap_or(0),
            cost: u.cost,
        });

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(Completion {
            message: choice.message.content.trim().to_string(),
            usage,
        })
    }
}

/// Pull the provider's message out of an error body, falling back to the
/// raw body when it is not the expected JSON shape.
fn extract_api_error(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
