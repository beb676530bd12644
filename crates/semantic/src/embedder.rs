use std::sync::Arc;

use async_trait::async_trait;

use crate::SemanticError;

/// Turns free text into a fixed-length vector.
///
/// Implementations are expected to reject empty input with
/// [`SemanticError::EmptyInput`] and to carry their own network timeout.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError>;
}

#[async_trait]
impl<T: Embedder + ?Sized> Embedder for Arc<T> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        (**self).embed(text).await
    }
}

/// Produces free-form text for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, SemanticError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String, SemanticError> {
        (**self).generate(prompt).await
    }
}
