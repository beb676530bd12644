use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::embedder::Embedder;
use crate::http::{build_client, post_json};
use crate::retry::with_retry;
use crate::similarity::l2_normalize_in_place;
use crate::{SemanticConfig, SemanticError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApiProviderKind {
    HuggingFace,
    OpenAI,
    Custom,
}

impl ApiProviderKind {
    fn from_config(cfg: &SemanticConfig) -> Self {
        let provider = cfg
            .api_provider
            .as_deref()
            .unwrap_or("openai")
            .to_ascii_lowercase();
        match provider.as_str() {
            "hf" | "huggingface" => ApiProviderKind::HuggingFace,
            "openai" | "gpt" => ApiProviderKind::OpenAI,
            _ => ApiProviderKind::Custom,
        }
    }
}

/// Remote embedding client speaking the OpenAI, Hugging Face, or a plain
/// `{"text": …}` dialect.
#[derive(Debug, Clone)]
pub struct ApiEmbedder {
    client: reqwest::Client,
    url: String,
    provider: ApiProviderKind,
    cfg: SemanticConfig,
}

impl ApiEmbedder {
    pub fn new(cfg: SemanticConfig) -> Result<Self, SemanticError> {
        let url = cfg
            .api_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| SemanticError::InvalidConfig("api_url is required for api mode".into()))?;
        if cfg.dimensions == Some(0) {
            return Err(SemanticError::InvalidConfig(
                "dimensions must be greater than zero".into(),
            ));
        }

        Ok(Self {
            client: build_client(cfg.api_timeout_secs)?,
            url,
            provider: ApiProviderKind::from_config(&cfg),
            cfg,
        })
    }

    pub fn config(&self) -> &SemanticConfig {
        &self.cfg
    }
}

#[async_trait]
impl Embedder for ApiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        if text.trim().is_empty() {
            return Err(SemanticError::EmptyInput);
        }

        let payload = build_api_payload(self.provider, text, &self.cfg);
        let retry = self.cfg.retry_config.unwrap_or_default();
        let client = &self.client;
        let url = self.url.as_str();
        let auth = self.cfg.api_auth_header.as_deref();
        let payload = &payload;

        let response = with_retry(&retry, "embed", move |_| {
            post_json(client, url, auth, payload)
        })
        .await?;

        let mut vector = parse_single_embedding(response)?;
        if self.cfg.normalize {
            l2_normalize_in_place(&mut vector);
        }

        tracing::debug!(
            target: "semantic::api",
            model = %self.cfg.model_name,
            dim = vector.len(),
            "embedding generated"
        );
        Ok(vector)
    }
}

fn build_api_payload(provider: ApiProviderKind, text: &str, cfg: &SemanticConfig) -> Value {
    match provider {
        ApiProviderKind::HuggingFace => json!({ "inputs": text }),
        ApiProviderKind::OpenAI => {
            let mut payload = json!({ "input": text, "model": cfg.model_name });
            if let Some(dimensions) = cfg.dimensions {
                payload["dimensions"] = json!(dimensions);
            }
            payload
        }
        ApiProviderKind::Custom => json!({ "text": text }),
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiItem {
    embedding: Vec<f32>,
}

/// Response shapes seen across providers. Order matters: a nested array must be
/// tried before a flat one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddingResponse {
    OpenAi { data: Vec<OpenAiItem> },
    Keyed { embeddings: Vec<Vec<f32>> },
    KeyedSingle { embedding: Vec<f32> },
    Batch(Vec<Vec<f32>>),
    Single(Vec<f32>),
}

fn parse_single_embedding(value: Value) -> Result<Vec<f32>, SemanticError> {
    let response: EmbeddingResponse = serde_json::from_value(value)
        .map_err(|_| SemanticError::MalformedResponse("unsupported API response shape".into()))?;

    let vector = match response {
        EmbeddingResponse::OpenAi { data } => data.into_iter().next().map(|item| item.embedding),
        EmbeddingResponse::Keyed { embeddings } | EmbeddingResponse::Batch(embeddings) => {
            embeddings.into_iter().next()
        }
        EmbeddingResponse::KeyedSingle { embedding } | EmbeddingResponse::Single(embedding) => {
            Some(embedding)
        }
    };

    match vector {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SemanticError::MalformedResponse(
            "API response did not contain an embedding".into(),
        )),
    }
}
