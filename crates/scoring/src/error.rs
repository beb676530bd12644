use semantic::SemanticError;
use thiserror::Error;

/// Why a lead could not be scored. [`crate::LeadScorer::score`] turns every
/// one of these into the fallback result; [`crate::LeadScorer::try_score`]
/// hands them back.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoringError {
    #[error("embedding failed: {0}")]
    Embedding(#[source] SemanticError),
    #[error("similarity failed: {0}")]
    Similarity(#[source] SemanticError),
    #[error("similarity is not a finite number: {0}")]
    NonFiniteSimilarity(f32),
    #[error("explanation failed: {0}")]
    Generation(#[source] SemanticError),
}
