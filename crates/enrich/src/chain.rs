use std::sync::Arc;
use std::time::Duration;

use crate::clearbit::ClearbitSource;
use crate::config::EnrichConfig;
use crate::phantombuster::PhantomBusterSource;
use crate::source::ProfileSource;
use crate::{EnrichError, EnrichmentPatch};

/// Ordered list of profile sources, primary first.
///
/// Sources are asked one at a time. The next one is consulted only while the
/// merged profile is still missing or has no avatar, and it can only fill
/// fields the earlier sources left empty.
#[derive(Clone)]
pub struct EnrichmentChain {
    sources: Vec<Arc<dyn ProfileSource>>,
    source_timeout: Duration,
}

impl std::fmt::Debug for EnrichmentChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentChain")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("source_timeout", &self.source_timeout)
            .finish()
    }
}

impl EnrichmentChain {
    pub fn new(source_timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            source_timeout,
        }
    }

    /// Clearbit first, PhantomBuster as fallback.
    pub fn from_config(cfg: &EnrichConfig) -> Result<Self, EnrichError> {
        Ok(Self::new(Duration::from_secs(cfg.source_timeout_secs.max(1)))
            .with_source(Arc::new(ClearbitSource::new(&cfg.clearbit)?))
            .with_source(Arc::new(PhantomBusterSource::new(&cfg.phantombuster)?)))
    }

    /// Append a source after the ones already registered.
    pub fn with_source(mut self, source: Arc<dyn ProfileSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn enrich(&self, email: &str) -> Option<EnrichmentPatch> {
        let email = email.trim();
        if email.is_empty() {
            return None;
        }

        let configured: Vec<&Arc<dyn ProfileSource>> =
            self.sources.iter().filter(|s| s.is_configured()).collect();
        if configured.is_empty() {
            tracing::info!(
                target: "enrich::chain",
                "no enrichment source configured, returning placeholder profile"
            );
            return Some(EnrichmentPatch::placeholder(email));
        }

        let mut merged: Option<EnrichmentPatch> = None;
        for source in configured {
            if merged.as_ref().is_some_and(EnrichmentPatch::has_avatar) {
                break;
            }

            match tokio::time::timeout(self.source_timeout, source.lookup(email)).await {
                Ok(Ok(Some(patch))) => {
                    tracing::debug!(target: "enrich::chain", source = source.name(), "profile match");
                    merged = Some(match merged {
                        Some(current) => current.merge(patch),
                        None => patch.normalized(),
                    });
                }
                Ok(Ok(None)) => {
                    tracing::debug!(target: "enrich::chain", source = source.name(), "no match");
                }
                Ok(Err(err)) => {
                    tracing::warn!(
                        target: "enrich::chain",
                        source = source.name(),
                        error = %err,
                        "enrichment source failed, trying next"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        target: "enrich::chain",
                        source = source.name(),
                        timeout_ms = self.source_timeout.as_millis() as u64,
                        "enrichment source timed out, trying next"
                    );
                }
            }
        }

        merged.filter(|p| !p.is_empty())
    }
}
