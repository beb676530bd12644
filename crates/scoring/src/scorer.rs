use std::sync::Arc;
use std::time::Instant;

use semantic::{cosine_similarity, Embedder, TextGenerator};

use crate::lead::Lead;
use crate::metrics::metrics_recorder;
use crate::profile::IdealCustomerProfile;
use crate::tier::{percent, truncate_explanation, ScoreResult, Tier};
use crate::ScoringError;

/// Scores a lead by embedding similarity to an ideal customer description and
/// asks a text generator to explain the tier.
#[derive(Clone)]
pub struct LeadScorer {
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn TextGenerator>,
    ideal: IdealCustomerProfile,
}

impl std::fmt::Debug for LeadScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadScorer")
            .field("ideal", &self.ideal)
            .finish_non_exhaustive()
    }
}

impl LeadScorer {
    pub fn new(embedder: Arc<dyn Embedder>, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            embedder,
            generator,
            ideal: IdealCustomerProfile::default(),
        }
    }

    /// Replace the description used when a call passes no criteria.
    pub fn with_ideal_customer(mut self, ideal: IdealCustomerProfile) -> Self {
        self.ideal = ideal;
        self
    }

    pub fn ideal_customer(&self) -> &IdealCustomerProfile {
        &self.ideal
    }

    /// Score `lead`, never failing. Any error becomes
    /// [`ScoreResult::fallback`] and is logged.
    pub async fn score(&self, lead: &Lead, criteria: Option<&str>) -> ScoreResult {
        let start = Instant::now();
        let (result, degraded) = match self.try_score(lead, criteria).await {
            Ok(result) => (result, false),
            Err(err) => {
                tracing::warn!(
                    target: "scoring::scorer",
                    lead_id = lead.id,
                    error = %err,
                    "lead could not be scored, using fallback"
                );
                (ScoreResult::fallback(), true)
            }
        };

        if let Some(recorder) = metrics_recorder() {
            recorder.record_score(start.elapsed(), result.tier, degraded);
        }
        result
    }

    pub async fn try_score(
        &self,
        lead: &Lead,
        criteria: Option<&str>,
    ) -> Result<ScoreResult, ScoringError> {
        let profile_text = lead.profile_text();
        let ideal_text = self.ideal.resolve(criteria);

        let (lead_vec, ideal_vec) = tokio::join!(
            self.embedder.embed(&profile_text),
            self.embedder.embed(ideal_text)
        );
        let lead_vec = lead_vec.map_err(ScoringError::Embedding)?;
        let ideal_vec = ideal_vec.map_err(ScoringError::Embedding)?;

        let similarity =
            cosine_similarity(&lead_vec, &ideal_vec).map_err(ScoringError::Similarity)?;
        if !similarity.is_finite() {
            return Err(ScoringError::NonFiniteSimilarity(similarity));
        }
        let tier = Tier::from_similarity(similarity);

        let prompt = explanation_prompt(&profile_text, ideal_text, tier, similarity);
        let raw = self
            .generator
            .generate(&prompt)
            .await
            .map_err(ScoringError::Generation)?;

        tracing::debug!(
            target: "scoring::scorer",
            lead_id = lead.id,
            similarity,
            tier = %tier,
            "lead scored"
        );

        Ok(ScoreResult {
            tier,
            similarity: similarity.clamp(0.0, 1.0),
            explanation: truncate_explanation(&raw),
        })
    }
}

pub(crate) fn explanation_prompt(
    profile_text: &str,
    ideal_text: &str,
    tier: Tier,
    similarity: f32,
) -> String {
    format!(
        "I'm analyzing a potential sales lead with the following profile:\n\
         {profile_text}\n\n\
         Compare this to our ideal customer profile criteria:\n\
         {ideal_text}\n\n\
         Based on the profile data, explain in 2-3 short sentences why this lead is scored as \
         \"{tier}\" quality (similarity score: {pct}%).\n\
         Focus on specific attributes like job title, company, and potential interest signals.\n\
         Your response should be 2-3 sentences only, and please be constructive even for \
         low-scored leads.",
        pct = percent(similarity),
    )
}
