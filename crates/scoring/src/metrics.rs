// Metrics hooks for lead scoring.
//
// Install a `ScoringMetrics` implementation with [`set_scoring_metrics`] and
// every `LeadScorer::score` and `BatchScoringScheduler::score_all` call reports
// to it. No metrics backend is assumed.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::batch::BatchScoringResult;
use crate::tier::Tier;

/// Metrics observer for scoring.
pub trait ScoringMetrics: Send + Sync {
    /// One lead scored. `degraded` is true when the fallback result was used.
    fn record_score(&self, latency: Duration, tier: Tier, degraded: bool);

    /// One batch finished.
    fn record_batch(&self, latency: Duration, result: &BatchScoringResult);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn ScoringMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn ScoringMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn ScoringMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global scoring metrics recorder.
pub fn set_scoring_metrics(recorder: Option<Arc<dyn ScoringMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}
