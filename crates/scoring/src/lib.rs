//! Lead Qualification: scoring
//!
//! [`LeadScorer`] embeds a lead's profile text and an ideal customer
//! description, compares them with cosine similarity, maps the result to a
//! [`Tier`] and asks a text generator for a short explanation. It never fails:
//! any provider or math error yields [`ScoreResult::fallback`].
//!
//! [`BatchScoringScheduler`] re-scores a whole event in chunks of
//! [`DEFAULT_CHUNK_SIZE`] leads and writes every score back through a
//! [`LeadStore`].

pub mod metrics;

mod batch;
mod config;
mod error;
mod lead;
mod profile;
mod scorer;
mod store;
mod tier;

pub use crate::batch::{BatchScoringResult, BatchScoringScheduler, DEFAULT_CHUNK_SIZE};
pub use crate::config::ScoringConfig;
pub use crate::error::ScoringError;
pub use crate::lead::{EventId, Lead, LeadId};
pub use crate::metrics::{set_scoring_metrics, ScoringMetrics};
pub use crate::profile::IdealCustomerProfile;
pub use crate::scorer::LeadScorer;
pub use crate::store::{LeadStore, MemoryLeadStore, StoreError};
pub use crate::tier::{
    truncate_explanation, ScoreResult, Tier, FALLBACK_EXPLANATION, FALLBACK_SIMILARITY,
    HIGH_THRESHOLD, MAX_EXPLANATION_CHARS, MEDIUM_THRESHOLD,
};
