use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::lead::{EventId, Lead};
use crate::metrics::metrics_recorder;
use crate::scorer::LeadScorer;
use crate::store::{LeadStore, StoreError};
use crate::tier::Tier;

/// Leads scored concurrently per chunk. Keeps a batch under the provider's
/// request rate limit.
pub const DEFAULT_CHUNK_SIZE: usize = 5;

/// Aggregate outcome of one batch.
///
/// `failed` counts leads whose score could not be written back; scoring
/// itself cannot fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchScoringResult {
    pub total: usize,
    pub processed: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub failed: usize,
}

impl BatchScoringResult {
    fn record(&mut self, tier: Tier) {
        self.processed += 1;
        match tier {
            Tier::High => self.high += 1,
            Tier::Medium => self.medium += 1,
            Tier::Low => self.low += 1,
        }
    }
}

/// Re-scores a set of leads chunk by chunk and persists every result.
#[derive(Clone)]
pub struct BatchScoringScheduler {
    scorer: Arc<LeadScorer>,
    store: Arc<dyn LeadStore>,
    chunk_size: usize,
}

impl BatchScoringScheduler {
    pub fn new(scorer: Arc<LeadScorer>, store: Arc<dyn LeadStore>) -> Self {
        Self {
            scorer,
            store,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Score every lead in `leads`. Chunks run one after another; the leads
    /// inside a chunk are scored concurrently, then persisted in order.
    pub async fn score_all(&self, leads: &[Lead], criteria: Option<&str>) -> BatchScoringResult {
        let start = Instant::now();
        let mut result = BatchScoringResult {
            total: leads.len(),
            ..Default::default()
        };

        for (index, chunk) in leads.chunks(self.chunk_size).enumerate() {
            let scores = join_all(chunk.iter().map(|lead| self.scorer.score(lead, criteria))).await;

            for (lead, score) in chunk.iter().zip(scores) {
                match self.store.persist_lead_score(lead.id, &score).await {
                    Ok(()) => result.record(score.tier),
                    Err(err) => {
                        result.failed += 1;
                        tracing::warn!(
                            target: "scoring::batch",
                            lead_id = lead.id,
                            error = %err,
                            "failed to persist lead score"
                        );
                    }
                }
            }

            tracing::debug!(
                target: "scoring::batch",
                chunk = index,
                leads = chunk.len(),
                processed = result.processed,
                failed = result.failed,
                total = result.total,
                "chunk complete"
            );
        }

        tracing::info!(
            target: "scoring::batch",
            total = result.total,
            processed = result.processed,
            high = result.high,
            medium = result.medium,
            low = result.low,
            failed = result.failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "batch scoring finished"
        );
        if let Some(recorder) = metrics_recorder() {
            recorder.record_batch(start.elapsed(), &result);
        }
        result
    }

    /// Load an event's leads from the store and score them all. Only the
    /// initial load can fail.
    pub async fn score_event(
        &self,
        event_id: EventId,
        criteria: Option<&str>,
    ) -> Result<BatchScoringResult, StoreError> {
        let leads = self.store.leads_for_event(event_id).await?;
        Ok(self.score_all(&leads, criteria).await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use semantic::{Embedder, SemanticError, TextGenerator};

    use super::*;
    use crate::store::MemoryLeadStore;
    use crate::tier::ScoreResult;

    /// Similarity is chosen by the lead's title: "high", "medium" or "low".
    struct TitleEmbedder;

    #[async_trait]
    impl Embedder for TitleEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
            let s: f32 = if text.contains("Title: high") {
                0.9
            } else if text.contains("Title: medium") {
                0.6
            } else if text.contains("Title: low") {
                0.2
            } else if text.starts_with("Name: ") {
                return Err(SemanticError::Transport("down".into()));
            } else {
                return Ok(vec![1.0, 0.0]);
            };
            Ok(vec![s, (1.0 - s * s).sqrt()])
        }
    }

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, _prompt: &str) -> Result<String, SemanticError> {
            Ok("explained".into())
        }
    }

    /// Persists into memory but rejects the listed ids.
    struct FlakyStore {
        inner: MemoryLeadStore,
        reject: Vec<i64>,
        writes: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl LeadStore for FlakyStore {
        async fn leads_for_event(&self, event_id: EventId) -> Result<Vec<Lead>, StoreError> {
            if event_id < 0 {
                return Err(StoreError::Backend("connection refused".into()));
            }
            self.inner.leads_for_event(event_id).await
        }

        async fn persist_lead_score(
            &self,
            lead_id: i64,
            score: &ScoreResult,
        ) -> Result<(), StoreError> {
            self.writes.lock().unwrap().push(lead_id);
            if self.reject.contains(&lead_id) {
                return Err(StoreError::Backend("write rejected".into()));
            }
            self.inner.persist_lead_score(lead_id, score).await
        }
    }

    fn leads(titles: &[&str]) -> Vec<Lead> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                Lead::new(i as i64 + 1, 1, "F", "L", format!("l{i}@x.io")).with_title(*t)
            })
            .collect()
    }

    fn scheduler(store: Arc<FlakyStore>) -> BatchScoringScheduler {
        let scorer = Arc::new(LeadScorer::new(Arc::new(TitleEmbedder), Arc::new(Echo)));
        BatchScoringScheduler::new(scorer, store)
    }

    fn flaky(leads: &[Lead], reject: Vec<i64>) -> Arc<FlakyStore> {
        Arc::new(FlakyStore {
            inner: MemoryLeadStore::from_leads(leads.iter().cloned()),
            reject,
            writes: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn counts_tiers_and_failures() {
        let batch = leads(&["high", "high", "medium", "low", "broken", "low", "medium"]);
        let store = flaky(&batch, vec![6]);
        let result = scheduler(store.clone()).score_all(&batch, None).await;

        assert_eq!(
            result,
            BatchScoringResult {
                total: 7,
                processed: 6,
                high: 2,
                // "broken" fails to embed and falls back to medium.
                medium: 3,
                low: 1,
                failed: 1,
            }
        );
        assert_eq!(result.processed + result.failed, result.total);
        assert_eq!(result.processed, result.high + result.medium + result.low);

        let stored = store.inner.get(1).unwrap();
        assert_eq!(stored.score, Tier::High);
        assert_eq!(stored.ai_score_explanation.as_deref(), Some("explained"));
    }

    #[tokio::test]
    async fn results_persist_in_input_order() {
        let batch = leads(&["low"; 12]);
        let store = flaky(&batch, vec![]);
        scheduler(store.clone()).score_all(&batch, None).await;
        let writes = store.writes.lock().unwrap().clone();
        assert_eq!(writes, (1..=12).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn empty_batch() {
        let store = flaky(&[], vec![]);
        let result = scheduler(store).score_all(&[], None).await;
        assert_eq!(result, BatchScoringResult::default());
    }

    #[tokio::test]
    async fn score_event_loads_from_store() {
        let batch = leads(&["high", "medium", "low"]);
        let store = flaky(&batch, vec![]);
        let result = scheduler(store).score_event(1, None).await.unwrap();
        assert_eq!(result.total, 3);
        assert_eq!((result.high, result.medium, result.low), (1, 1, 1));
    }

    #[tokio::test]
    async fn score_event_surfaces_load_errors() {
        let store = flaky(&[], vec![]);
        assert!(matches!(
            scheduler(store).score_event(-1, None).await,
            Err(StoreError::Backend(_))
        ));
    }

    #[test]
    fn chunk_size_is_at_least_one() {
        let store = flaky(&[], vec![]);
        assert_eq!(scheduler(store.clone()).chunk_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(scheduler(store).with_chunk_size(0).chunk_size(), 1);
    }
}
