use std::fmt;

use serde::{Deserialize, Serialize};

/// Similarity at or above this is a high-quality lead.
pub const HIGH_THRESHOLD: f32 = 0.75;
/// Similarity at or above this (and below [`HIGH_THRESHOLD`]) is medium.
pub const MEDIUM_THRESHOLD: f32 = 0.50;

pub const FALLBACK_SIMILARITY: f32 = 0.5;
pub const FALLBACK_EXPLANATION: &str =
    "Lead could not be automatically scored. Please review manually.";
pub const MAX_EXPLANATION_CHARS: usize = 200;
pub(crate) const EMPTY_EXPLANATION: &str = "No explanation available";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    #[default]
    Medium,
    Low,
}

impl Tier {
    pub fn from_similarity(similarity: f32) -> Self {
        if similarity >= HIGH_THRESHOLD {
            Tier::High
        } else if similarity >= MEDIUM_THRESHOLD {
            Tier::Medium
        } else {
            Tier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub tier: Tier,
    /// Cosine similarity clamped to `[0, 1]`.
    pub similarity: f32,
    /// Never empty, at most [`MAX_EXPLANATION_CHARS`] characters.
    pub explanation: String,
}

impl ScoreResult {
    pub fn fallback() -> Self {
        Self {
            tier: Tier::Medium,
            similarity: FALLBACK_SIMILARITY,
            explanation: FALLBACK_EXPLANATION.to_owned(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }

    /// Rounded percentage, as shown to the model and to users.
    pub fn percent(&self) -> u32 {
        percent(self.similarity)
    }
}

pub(crate) fn percent(similarity: f32) -> u32 {
    (similarity.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Cut to [`MAX_EXPLANATION_CHARS`] characters, ending in `...` when cut.
/// Blank text becomes a fixed notice so the result is never empty.
pub fn truncate_explanation(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return EMPTY_EXPLANATION.to_owned();
    }
    if text.chars().count() <= MAX_EXPLANATION_CHARS {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(MAX_EXPLANATION_CHARS - 3).collect();
    cut.push_str("...");
    cut
}
