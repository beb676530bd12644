use serde::{Deserialize, Serialize};

use crate::batch::DEFAULT_CHUNK_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Replaces the built-in ideal customer description.
    pub ideal_customer_profile: Option<String>,
    /// Leads scored concurrently per batch chunk.
    pub chunk_size: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ideal_customer_profile: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ScoringConfig {
    pub fn with_ideal_customer_profile(mut self, description: impl Into<String>) -> Self {
        self.ideal_customer_profile = Some(description.into());
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}
