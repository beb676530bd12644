//! Hand-written collaborators shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use leadqual::{
    EnrichError, EnrichmentChain, EnrichmentPatch, EventId, Lead, LeadId, LeadPipeline,
    LeadScorer, LeadStore, MemoryLeadStore, ProfileSource, ScoreResult, SemanticError,
    StoreError, TextGenerator, Embedder,
};

pub const IDEAL: [f32; 2] = [1.0, 0.0];

/// Unit vector whose cosine with [`IDEAL`] is `s`.
pub fn at_similarity(s: f32) -> Vec<f32> {
    vec![s, (1.0 - s * s).sqrt()]
}

/// Lead whose title selects its similarity in [`ScriptedEmbedder`].
pub fn lead(id: LeadId, event: EventId, title: &str) -> Lead {
    Lead::new(id, event, "Test", format!("Lead{id}"), format!("lead{id}@techcorp.com"))
        .with_title(title)
        .with_company("TechCorp")
}

pub fn leads(event: EventId, titles: &[&str]) -> Vec<Lead> {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| lead(i as LeadId + 1, event, t))
        .collect()
}

fn lead_id_of(text: &str) -> Option<LeadId> {
    let rest = text.split("Email: lead").nth(1)?;
    rest.split('@').next()?.parse().ok()
}

/// Embeds lead profile texts by title keyword:
/// `CTO`/`high` → 0.82, `medium` → 0.6, `low` → 0.3, `broken` → provider error.
/// Anything that is not a lead profile embeds to [`IDEAL`].
#[derive(Default)]
pub struct ScriptedEmbedder {
    pub delay: Option<Duration>,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
    /// `start:<id>` / `end:<id>` for lead profile embeddings, in order.
    pub events: Mutex<Vec<String>>,
}

impl ScriptedEmbedder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Embedder for ScriptedEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SemanticError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let id = lead_id_of(text);
        if let Some(id) = id {
            self.events.lock().unwrap().push(format!("start:{id}"));
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if let Some(id) = id {
            self.events.lock().unwrap().push(format!("end:{id}"));
        }

        if !text.starts_with("Name: ") {
            return Ok(IDEAL.to_vec());
        }
        let similarity = if text.contains("Title: broken") {
            return Err(SemanticError::Status {
                status: 500,
                body: "embedding backend down".into(),
            });
        } else if text.contains("Title: CTO") || text.contains("Title: high") {
            0.82
        } else if text.contains("Title: medium") {
            0.6
        } else {
            0.3
        };
        Ok(at_similarity(similarity))
    }
}

/// Generator returning a fixed reply, or failing when `reply` is `None`.
pub struct FixedGenerator {
    pub reply: Option<String>,
    pub calls: AtomicUsize,
}

impl FixedGenerator {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_owned()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, SemanticError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| SemanticError::Timeout("completion timed out".into()))
    }
}

/// Memory store that rejects writes for chosen ids and can fail event loads.
pub struct FlakyStore {
    pub inner: MemoryLeadStore,
    pub reject: Vec<LeadId>,
    pub fail_loads: bool,
}

impl FlakyStore {
    pub fn new(leads: &[Lead], reject: Vec<LeadId>) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryLeadStore::from_leads(leads.iter().cloned()),
            reject,
            fail_loads: false,
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryLeadStore::new(),
            reject: Vec::new(),
            fail_loads: true,
        })
    }
}

#[async_trait]
impl LeadStore for FlakyStore {
    async fn leads_for_event(&self, event_id: EventId) -> Result<Vec<Lead>, StoreError> {
        if self.fail_loads {
            return Err(StoreError::Backend("database unreachable".into()));
        }
        self.inner.leads_for_event(event_id).await
    }

    async fn persist_lead_score(
        &self,
        lead_id: LeadId,
        score: &ScoreResult,
    ) -> Result<(), StoreError> {
        if self.reject.contains(&lead_id) {
            return Err(StoreError::Backend(format!("write for lead {lead_id} rejected")));
        }
        self.inner.persist_lead_score(lead_id, score).await
    }
}

/// Profile source with a fixed answer.
pub struct StaticSource {
    pub name: &'static str,
    pub answer: Result<Option<EnrichmentPatch>, EnrichError>,
    pub calls: AtomicUsize,
}

impl StaticSource {
    pub fn found(name: &'static str, patch: EnrichmentPatch) -> Arc<Self> {
        Self::with(name, Ok(Some(patch)))
    }

    pub fn empty(name: &'static str) -> Arc<Self> {
        Self::with(name, Ok(None))
    }

    pub fn failing(name: &'static str) -> Arc<Self> {
        Self::with(
            name,
            Err(EnrichError::Status {
                status: 429,
                body: "rate limited".into(),
            }),
        )
    }

    fn with(name: &'static str, answer: Result<Option<EnrichmentPatch>, EnrichError>) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileSource for StaticSource {
    fn name(&self) -> &str {
        self.name
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn lookup(&self, _email: &str) -> Result<Option<EnrichmentPatch>, EnrichError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

pub fn pipeline(
    embedder: Arc<ScriptedEmbedder>,
    generator: Arc<FixedGenerator>,
    store: Arc<dyn LeadStore>,
    sources: Vec<Arc<StaticSource>>,
) -> LeadPipeline {
    let chain = sources
        .into_iter()
        .fold(EnrichmentChain::new(Duration::from_secs(5)), |chain, source| {
            chain.with_source(source)
        });
    LeadPipeline::new(LeadScorer::new(embedder, generator), store, chain)
}
