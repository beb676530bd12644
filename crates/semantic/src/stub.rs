use async_trait::async_trait;
use fxhash::hash64;

use crate::embedder::{Embedder, TextGenerator};
use crate::similarity::l2_normalize_in_place;
use crate::SemanticError;

/// Deterministic offline embedder for `mode: "fast"`.
///
/// Sinusoid values seeded by a hash of the text: the same text always maps to
/// the same vector, different texts almost never do. The vectors carry no
/// meaning, so similarities between them are arbitrary.
#[derive(Debug, Clone, Copy)]
pub struct StubEmbedder {
    dim: usize,
    normalize: bool,
}

impl StubEmbedder {
    pub fn new(dim: usize, normalize: bool) -> Self {
        Self {
            dim: dim.max(1),
            normalize,
        }
    }

    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let h = hash64(text.as_bytes());
        let mut v: Vec<f32> = (0..self.dim)
            .map(|idx| ((h >> (idx % 32)) as f32 * 0.0001).sin())
            .collect();
        if self.normalize {
            l2_normalize_in_place(&mut v);
        }
        v
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        if text.trim().is_empty() {
            return Err(SemanticError::EmptyInput);
        }
        Ok(self.vector_for(text))
    }
}

/// Canned generator for offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubGenerator;

pub(crate) const STUB_EXPLANATION: &str =
    "Scored offline against the ideal customer profile; no generated explanation is available.";

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, SemanticError> {
        Ok(STUB_EXPLANATION.to_owned())
    }
}
