use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;

/// How embeddings are produced and where they come from.
///
/// # Example
/// ```no_run
/// use semantic::{ApiEmbedder, SemanticConfig};
///
/// let cfg = SemanticConfig {
///     api_auth_header: Some("Bearer sk-xxx".into()),
///     ..Default::default()
/// };
/// let embedder = ApiEmbedder::new(cfg).expect("valid config");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SemanticConfig {
    /// `"api"` (remote HTTP) or `"fast"` (deterministic offline stub).
    pub mode: String,
    /// Model identifier sent to the provider.
    pub model_name: String,
    /// Requested output dimension; also the stub's vector length.
    pub dimensions: Option<usize>,
    /// Embedding endpoint when [`mode`](Self::mode) is `"api"`.
    pub api_url: Option<String>,
    /// Authorization header value (e.g. `"Bearer sk-xxx"`). Never serialized.
    #[serde(skip_serializing)]
    pub api_auth_header: Option<String>,
    /// Payload dialect: `"openai"` (default), `"hf"`, or `"custom"`.
    pub api_provider: Option<String>,
    /// Per-request network timeout in seconds.
    pub api_timeout_secs: u64,
    /// L2-normalize returned vectors. Cosine similarity doesn't need it.
    pub normalize: bool,
    /// Retry policy; `None` means a single attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_config: Option<RetryConfig>,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "api".into(),
            model_name: "text-embedding-3-small".into(),
            dimensions: Some(1536),
            api_url: Some("https://api.openai.com/v1/embeddings".into()),
            api_auth_header: None,
            api_provider: Some("openai".into()),
            api_timeout_secs: 30,
            normalize: false,
            retry_config: None,
        }
    }
}

/// Chat-completion settings for score explanations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// `"api"` or `"fast"` (canned offline text).
    pub mode: String,
    pub model_name: String,
    pub api_url: Option<String>,
    #[serde(skip_serializing)]
    pub api_auth_header: Option<String>,
    pub api_timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_config: Option<RetryConfig>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mode: "api".into(),
            model_name: "gpt-4o".into(),
            api_url: Some("https://api.openai.com/v1/chat/completions".into()),
            api_auth_header: None,
            api_timeout_secs: 30,
            max_tokens: 120,
            temperature: 0.7,
            retry_config: None,
        }
    }
}

/// `Authorization` value for a bearer token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_defaults_target_openai_small_model() {
        let cfg = SemanticConfig::default();
        assert_eq!(cfg.mode, "api");
        assert_eq!(cfg.model_name, "text-embedding-3-small");
        assert_eq!(cfg.dimensions, Some(1536));
        assert_eq!(cfg.api_provider.as_deref(), Some("openai"));
        assert_eq!(cfg.api_timeout_secs, 30);
        assert!(cfg.api_auth_header.is_none());
        assert!(cfg.retry_config.is_none());
    }

    #[test]
    fn generation_defaults() {
        let cfg = GenerationConfig::default();
        assert_eq!(cfg.model_name, "gpt-4o");
        assert_eq!(cfg.max_tokens, 120);
        assert!((cfg.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SemanticConfig =
            serde_json::from_str(r#"{ "mode": "fast", "dimensions": 8 }"#).unwrap();
        assert_eq!(cfg.mode, "fast");
        assert_eq!(cfg.dimensions, Some(8));
        assert_eq!(cfg.model_name, "text-embedding-3-small");
    }

    #[test]
    fn retry_config_is_omitted_when_unset() {
        let json = serde_json::to_value(SemanticConfig::default()).unwrap();
        assert!(json.get("retry_config").is_none());
    }

    #[test]
    fn auth_header_is_never_serialized() {
        let cfg = SemanticConfig {
            api_auth_header: Some(bearer("sk-live")),
            ..Default::default()
        };
        assert!(!serde_json::to_string(&cfg).unwrap().contains("sk-live"));
    }

    #[test]
    fn bearer_formats_header() {
        assert_eq!(bearer("abc"), "Bearer abc");
    }
}
