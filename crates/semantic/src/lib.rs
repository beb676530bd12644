//! Lead Qualification: semantic layer
//!
//! Everything numeric or model-backed that lead scoring needs:
//!
//! - [`cosine_similarity`] and [`rank_profiles`] over plain `f32` vectors.
//! - The [`Embedder`] contract plus two implementations: [`ApiEmbedder`]
//!   (remote HTTP, OpenAI/Hugging Face/custom dialects) and [`StubEmbedder`]
//!   (deterministic, offline).
//! - The [`TextGenerator`] contract with [`ChatCompletionClient`] and a canned
//!   [`StubGenerator`].
//!
//! Provider calls never retry unless a [`RetryConfig`] says so. Every client
//! carries its own request timeout; a timeout is reported as
//! [`SemanticError::Timeout`] and treated like any other provider failure by
//! callers.
//!
//! ## Quick example
//!
//! ```no_run
//! use semantic::{build_embedder, cosine_similarity, Embedder, SemanticConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), semantic::SemanticError> {
//!     let embedder = build_embedder(&SemanticConfig {
//!         mode: "fast".into(),
//!         dimensions: Some(256),
//!         ..Default::default()
//!     })?;
//!     let a = embedder.embed("VP Engineering at a fintech").await?;
//!     let b = embedder.embed("Director of IT, regional bank").await?;
//!     println!("similarity = {}", cosine_similarity(&a, &b)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod retry;
pub mod similarity;

mod api;
mod embedder;
mod generate;
mod http;
mod stub;

use std::sync::Arc;

pub use crate::api::ApiEmbedder;
pub use crate::config::{bearer, GenerationConfig, SemanticConfig};
pub use crate::embedder::{Embedder, TextGenerator};
pub use crate::error::SemanticError;
pub use crate::generate::ChatCompletionClient;
pub use crate::retry::RetryConfig;
pub use crate::similarity::{cosine_similarity, rank_profiles, RankedProfile};
pub use crate::stub::{StubEmbedder, StubGenerator};

/// Dimension used by the stub when the config doesn't name one.
pub const DEFAULT_DIMENSIONS: usize = 1536;

/// Pick the embedder implementation for `cfg.mode`.
pub fn build_embedder(cfg: &SemanticConfig) -> Result<Arc<dyn Embedder>, SemanticError> {
    match cfg.mode.as_str() {
        "fast" => Ok(Arc::new(StubEmbedder::new(
            cfg.dimensions.unwrap_or(DEFAULT_DIMENSIONS),
            cfg.normalize,
        ))),
        "api" => Ok(Arc::new(ApiEmbedder::new(cfg.clone())?)),
        other => Err(SemanticError::InvalidConfig(format!(
            "unknown embedding mode `{other}` (expected `api` or `fast`)"
        ))),
    }
}

/// Pick the text generator implementation for `cfg.mode`.
pub fn build_generator(cfg: &GenerationConfig) -> Result<Arc<dyn TextGenerator>, SemanticError> {
    match cfg.mode.as_str() {
        "fast" => Ok(Arc::new(StubGenerator)),
        "api" => Ok(Arc::new(ChatCompletionClient::new(cfg.clone())?)),
        other => Err(SemanticError::InvalidConfig(format!(
            "unknown generation mode `{other}` (expected `api` or `fast`)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fast_mode_builds_deterministic_stub() {
        let cfg = SemanticConfig {
            mode: "fast".into(),
            dimensions: Some(32),
            ..Default::default()
        };
        let embedder = build_embedder(&cfg).unwrap();
        let a = embedder.embed("Head of Data, TechCorp").await.unwrap();
        let b = embedder.embed("Head of Data, TechCorp").await.unwrap();
        assert_eq!(a.len(), 32);
        assert_eq!(a, b);
        assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn fast_mode_without_dimensions_uses_default() {
        let cfg = SemanticConfig {
            mode: "fast".into(),
            dimensions: None,
            ..Default::default()
        };
        assert!(build_embedder(&cfg).is_ok());
    }

    #[test]
    fn api_mode_builds_http_client() {
        assert!(build_embedder(&SemanticConfig::default()).is_ok());
        assert!(build_generator(&GenerationConfig::default()).is_ok());
    }

    #[test]
    fn unknown_modes_are_config_errors() {
        let cfg = SemanticConfig {
            mode: "onnx".into(),
            ..Default::default()
        };
        assert!(matches!(
            build_embedder(&cfg),
            Err(SemanticError::InvalidConfig(_))
        ));

        let generation = GenerationConfig {
            mode: "local".into(),
            ..Default::default()
        };
        assert!(matches!(
            build_generator(&generation),
            Err(SemanticError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn fast_generator_returns_text() {
        let generator = build_generator(&GenerationConfig {
            mode: "fast".into(),
            ..Default::default()
        })
        .unwrap();
        assert!(!generator.generate("prompt").await.unwrap().is_empty());
    }
}
