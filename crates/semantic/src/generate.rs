use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::embedder::TextGenerator;
use crate::http::{build_client, post_json};
use crate::retry::with_retry;
use crate::{GenerationConfig, SemanticError};

/// OpenAI-compatible chat-completion client used for score explanations.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    url: String,
    cfg: GenerationConfig,
}

impl ChatCompletionClient {
    pub fn new(cfg: GenerationConfig) -> Result<Self, SemanticError> {
        let url = cfg
            .api_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                SemanticError::InvalidConfig("api_url is required for text generation".into())
            })?;

        Ok(Self {
            client: build_client(cfg.api_timeout_secs)?,
            url,
            cfg,
        })
    }

    fn payload(&self, prompt: &str) -> Value {
        json!({
            "model": self.cfg.model_name,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.cfg.max_tokens,
            "temperature": self.cfg.temperature,
        })
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn generate(&self, prompt: &str) -> Result<String, SemanticError> {
        if prompt.trim().is_empty() {
            return Err(SemanticError::EmptyInput);
        }

        let payload = self.payload(prompt);
        let retry = self.cfg.retry_config.unwrap_or_default();
        let client = &self.client;
        let url = self.url.as_str();
        let auth = self.cfg.api_auth_header.as_deref();
        let payload = &payload;

        let response = with_retry(&retry, "generate", move |_| {
            post_json(client, url, auth, payload)
        })
        .await?;

        let text = parse_completion(response)?;
        tracing::debug!(
            target: "semantic::generate",
            model = %self.cfg.model_name,
            chars = text.chars().count(),
            "completion received"
        );
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// First choice's content, trimmed. A missing content field yields an empty
/// string; deciding what to show instead is the caller's business.
fn parse_completion(value: Value) -> Result<String, SemanticError> {
    let response: ChatResponse = serde_json::from_value(value)
        .map_err(|e| SemanticError::MalformedResponse(format!("unexpected completion shape: {e}")))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| SemanticError::MalformedResponse("completion had no choices".into()))?;

    Ok(choice.message.content.unwrap_or_default().trim().to_owned())
}
