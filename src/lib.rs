//! Lead qualification pipeline.
//!
//! Ties the workspace crates together behind [`LeadPipeline`]:
//!
//! - `semantic`: embeddings, text generation, cosine similarity.
//! - `enrich`: profile lookup by email with primary/fallback sources.
//! - `scoring`: similarity tiers, explanations, chunked batch re-scoring.
//!
//! ```no_run
//! use std::sync::Arc;
//! use leadqual::{Lead, LeadPipeline, LeadQualConfig, MemoryLeadStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = LeadQualConfig::from_file("leadqual.yaml")?;
//! config.apply_env();
//!
//! let store = Arc::new(MemoryLeadStore::new());
//! let pipeline = LeadPipeline::from_config(&config, store)?;
//!
//! let lead = Lead::new(1, 7, "Jane", "Doe", "jane@techcorp.com")
//!     .with_title("CTO")
//!     .with_company("TechCorp");
//! let result = pipeline.score_lead(&lead, None).await;
//! println!("{} ({:.2}): {}", result.tier, result.similarity, result.explanation);
//! # Ok(())
//! # }
//! ```

pub mod config;

use std::sync::Arc;

use thiserror::Error;

pub use crate::config::{ConfigLoadError, LeadQualConfig, SecretEnv};
pub use enrich::{
    ClearbitConfig, ClearbitSource, EnrichConfig, EnrichError, EnrichmentChain, EnrichmentPatch,
    PhantomBusterConfig, PhantomBusterSource, ProfileSource,
};
pub use scoring::{
    set_scoring_metrics, truncate_explanation, BatchScoringResult, BatchScoringScheduler, EventId,
    IdealCustomerProfile, Lead, LeadId, LeadScorer, LeadStore, MemoryLeadStore, ScoreResult,
    ScoringConfig, ScoringError, ScoringMetrics, StoreError, Tier, DEFAULT_CHUNK_SIZE,
    FALLBACK_EXPLANATION, FALLBACK_SIMILARITY, HIGH_THRESHOLD, MAX_EXPLANATION_CHARS,
    MEDIUM_THRESHOLD,
};
pub use semantic::{
    build_embedder, build_generator, cosine_similarity, rank_profiles, Embedder,
    GenerationConfig, RankedProfile, RetryConfig, SemanticConfig, SemanticError, StubEmbedder,
    StubGenerator, TextGenerator,
};

/// Failures while assembling a [`LeadPipeline`]. Running it never fails
/// except for [`LeadPipeline::score_event_by_id`] loading leads.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("semantic setup failed: {0}")]
    Semantic(#[from] SemanticError),
    #[error("enrichment setup failed: {0}")]
    Enrich(#[from] EnrichError),
}

/// Scoring, batch re-scoring and enrichment behind one handle.
#[derive(Clone)]
pub struct LeadPipeline {
    scorer: Arc<LeadScorer>,
    batch: BatchScoringScheduler,
    enrichment: EnrichmentChain,
}

impl std::fmt::Debug for LeadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadPipeline")
            .field("scorer", &self.scorer)
            .field("chunk_size", &self.batch.chunk_size())
            .field("enrichment", &self.enrichment)
            .finish()
    }
}

impl LeadPipeline {
    pub fn new(scorer: LeadScorer, store: Arc<dyn LeadStore>, enrichment: EnrichmentChain) -> Self {
        let scorer = Arc::new(scorer);
        Self {
            batch: BatchScoringScheduler::new(scorer.clone(), store),
            scorer,
            enrichment,
        }
    }

    /// Build the provider clients and enrichment sources named by `config`.
    /// Credentials must already be applied (see [`LeadQualConfig::apply_env`]).
    pub fn from_config(
        config: &LeadQualConfig,
        store: Arc<dyn LeadStore>,
    ) -> Result<Self, PipelineError> {
        let embedder = build_embedder(&config.embedding)?;
        let generator = build_generator(&config.generation)?;

        let mut scorer = LeadScorer::new(embedder, generator);
        if let Some(ideal) = config
            .scoring
            .ideal_customer_profile
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            scorer = scorer.with_ideal_customer(IdealCustomerProfile::new(ideal.trim()));
        }

        let enrichment = EnrichmentChain::from_config(&config.enrichment)?;
        Ok(Self::new(scorer, store, enrichment).with_chunk_size(config.scoring.chunk_size))
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.batch = self.batch.with_chunk_size(chunk_size);
        self
    }

    pub fn scorer(&self) -> &LeadScorer {
        &self.scorer
    }

    pub async fn score_lead(&self, lead: &Lead, criteria: Option<&str>) -> ScoreResult {
        self.scorer.score(lead, criteria).await
    }

    pub async fn score_event(&self, leads: &[Lead], criteria: Option<&str>) -> BatchScoringResult {
        self.batch.score_all(leads, criteria).await
    }

    pub async fn score_event_by_id(
        &self,
        event_id: EventId,
        criteria: Option<&str>,
    ) -> Result<BatchScoringResult, StoreError> {
        self.batch.score_event(event_id, criteria).await
    }

    pub async fn enrich_by_email(&self, email: &str) -> Option<EnrichmentPatch> {
        self.enrichment.enrich(email).await
    }

    /// Enrich by the lead's email and fill the fields the lead is missing.
    /// Returns whether anything changed.
    pub async fn enrich_lead(&self, lead: &mut Lead) -> bool {
        match self.enrich_by_email(&lead.email).await {
            Some(patch) => apply_enrichment(lead, &patch),
            None => false,
        }
    }
}

/// Copy patch values into the lead's empty fields.
///
/// A field the lead already holds (non-blank) is never overwritten, so data
/// captured by hand always wins over enrichment. A placeholder patch (see
/// [`EnrichmentPatch::is_placeholder`]) contributes only its avatar and the
/// company derived from the email domain; its title and bio are display text
/// and never reach the lead or its scoring input.
///
/// Returns `true` if at least one field changed.
pub fn apply_enrichment(lead: &mut Lead, patch: &EnrichmentPatch) -> bool {
    fn fill_required(slot: &mut String, value: &Option<String>) -> bool {
        match value.as_deref().map(str::trim) {
            Some(v) if slot.trim().is_empty() && !v.is_empty() => {
                *slot = v.to_owned();
                true
            }
            _ => false,
        }
    }

    fn fill(slot: &mut Option<String>, value: &Option<String>) -> bool {
        let empty = slot.as_deref().map_or(true, |s| s.trim().is_empty());
        match value.as_deref().map(str::trim) {
            Some(v) if empty && !v.is_empty() => {
                *slot = Some(v.to_owned());
                true
            }
            _ => false,
        }
    }

    if patch.is_placeholder() {
        let avatar = fill(&mut lead.avatar, &patch.avatar);
        let company = fill(&mut lead.company, &patch.company);
        return avatar || company;
    }

    let mut changed = false;
    changed |= fill_required(&mut lead.first_name, &patch.first_name);
    changed |= fill_required(&mut lead.last_name, &patch.last_name);
    changed |= fill(&mut lead.title, &patch.title);
    changed |= fill(&mut lead.company, &patch.company);
    changed |= fill(&mut lead.avatar, &patch.avatar);
    changed |= fill(&mut lead.location, &patch.location);
    changed |= fill(&mut lead.industry, &patch.industry);
    changed |= fill(&mut lead.bio, &patch.bio);
    changed |= fill(&mut lead.linkedin_url, &patch.linkedin_url);
    changed
}
