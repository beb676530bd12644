use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use crate::lead::{EventId, Lead, LeadId};
use crate::tier::ScoreResult;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("lead {0} not found")]
    LeadNotFound(LeadId),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Where leads come from and where scores are written back.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn leads_for_event(&self, event_id: EventId) -> Result<Vec<Lead>, StoreError>;

    /// Write `score`, `aiSimilarityScore` and `aiScoreExplanation` onto the lead.
    async fn persist_lead_score(&self, lead_id: LeadId, score: &ScoreResult)
        -> Result<(), StoreError>;
}

/// In-process [`LeadStore`] keyed by lead id.
#[derive(Debug, Default)]
pub struct MemoryLeadStore {
    leads: DashMap<LeadId, Lead>,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_leads(leads: impl IntoIterator<Item = Lead>) -> Self {
        let store = Self::new();
        for lead in leads {
            store.insert(lead);
        }
        store
    }

    /// Insert or replace by id.
    pub fn insert(&self, lead: Lead) {
        self.leads.insert(lead.id, lead);
    }

    pub fn get(&self, id: LeadId) -> Option<Lead> {
        self.leads.get(&id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// Every stored lead, ordered by id.
    pub fn snapshot(&self) -> Vec<Lead> {
        let mut leads: Vec<Lead> = self.leads.iter().map(|e| e.value().clone()).collect();
        leads.sort_by_key(|lead| lead.id);
        leads
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn leads_for_event(&self, event_id: EventId) -> Result<Vec<Lead>, StoreError> {
        let mut leads: Vec<Lead> = self
            .leads
            .iter()
            .filter(|entry| entry.event_id == event_id)
            .map(|entry| entry.value().clone())
            .collect();
        leads.sort_by_key(|lead| lead.id);
        Ok(leads)
    }

    async fn persist_lead_score(
        &self,
        lead_id: LeadId,
        score: &ScoreResult,
    ) -> Result<(), StoreError> {
        let mut lead = self
            .leads
            .get_mut(&lead_id)
            .ok_or(StoreError::LeadNotFound(lead_id))?;
        lead.score = score.tier;
        lead.ai_similarity_score = Some(score.similarity);
        lead.ai_score_explanation = Some(score.explanation.clone());
        Ok(())
    }
}
