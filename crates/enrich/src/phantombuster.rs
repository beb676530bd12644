use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::PhantomBusterConfig;
use crate::http::{build_client, join_url, status_error};
use crate::source::ProfileSource;
use crate::{EnrichError, EnrichmentPatch};

const KEY_HEADER: &str = "X-Phantombuster-Key";
const LAUNCH_PATH: &str = "/api/v2/agents/launch";
const OUTPUT_PATH: &str = "/api/v2/containers/fetch-output";

/// Fallback source: launches a PhantomBuster search agent for the email and
/// polls the container until it finishes.
#[derive(Debug, Clone)]
pub struct PhantomBusterSource {
    client: reqwest::Client,
    credentials: Option<(String, String)>,
    base_url: String,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl PhantomBusterSource {
    pub fn new(cfg: &PhantomBusterConfig) -> Result<Self, EnrichError> {
        let key = cfg.api_key.clone().filter(|k| !k.trim().is_empty());
        let agent = cfg.agent_id.clone().filter(|a| !a.trim().is_empty());
        Ok(Self {
            client: build_client(cfg.request_timeout_secs)?,
            credentials: key.zip(agent),
            base_url: cfg.base_url.clone(),
            poll_attempts: cfg.poll_attempts,
            poll_interval: Duration::from_millis(cfg.poll_interval_ms),
        })
    }

    async fn launch(&self, key: &str, agent_id: &str, email: &str) -> Result<String, EnrichError> {
        let response = self
            .client
            .post(join_url(&self.base_url, LAUNCH_PATH))
            .header(KEY_HEADER, key)
            .json(&json!({ "id": agent_id, "argument": { "emailSearch": email } }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let launched: LaunchResponse = response
            .json()
            .await
            .map_err(|e| EnrichError::MalformedResponse(format!("agent launch: {e}")))?;
        Ok(launched.container_id)
    }

    /// `Ok(None)` while the container is still running. A failed poll request
    /// is skipped like an unfinished one.
    async fn poll_once(&self, key: &str, container_id: &str) -> Option<ContainerOutput> {
        let response = self
            .client
            .get(join_url(&self.base_url, OUTPUT_PATH))
            .query(&[("id", container_id)])
            .header(KEY_HEADER, key)
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::debug!(target: "enrich::phantombuster", status = r.status().as_u16(), "poll rejected");
                return None;
            }
            Err(err) => {
                tracing::debug!(target: "enrich::phantombuster", error = %err, "poll failed");
                return None;
            }
        };

        match response.json::<ContainerOutput>().await {
            Ok(output) if output.status == "finished" => Some(output),
            Ok(_) => None,
            Err(err) => {
                tracing::debug!(target: "enrich::phantombuster", error = %err, "unreadable poll body");
                None
            }
        }
    }
}

#[async_trait]
impl ProfileSource for PhantomBusterSource {
    fn name(&self) -> &str {
        "phantombuster"
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    async fn lookup(&self, email: &str) -> Result<Option<EnrichmentPatch>, EnrichError> {
        let (key, agent_id) = self
            .credentials
            .as_ref()
            .ok_or(EnrichError::MissingCredentials("phantombuster"))?;

        let container_id = self.launch(key, agent_id, email).await?;
        tracing::debug!(target: "enrich::phantombuster", container = %container_id, "agent launched");

        for attempt in 1..=self.poll_attempts {
            tokio::time::sleep(self.poll_interval).await;
            if let Some(finished) = self.poll_once(key, &container_id).await {
                tracing::debug!(target: "enrich::phantombuster", attempt, "agent finished");
                return Ok(finished.output.map(AgentProfile::into_patch).filter(|p| !p.is_empty()));
            }
        }

        tracing::debug!(
            target: "enrich::phantombuster",
            attempts = self.poll_attempts,
            "agent did not finish in time"
        );
        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LaunchResponse {
    container_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContainerOutput {
    status: String,
    output: Option<AgentProfile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AgentProfile {
    first_name: Option<String>,
    last_name: Option<String>,
    profile_image: Option<String>,
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    industry: Option<String>,
    summary: Option<String>,
    linked_in_url: Option<String>,
}

impl AgentProfile {
    fn into_patch(self) -> EnrichmentPatch {
        EnrichmentPatch {
            first_name: self.first_name,
            last_name: self.last_name,
            avatar: self.profile_image,
            title: self.title,
            company: self.company,
            location: self.location,
            industry: self.industry,
            bio: self.summary,
            linkedin_url: self.linked_in_url,
            ..EnrichmentPatch::default()
        }
        .normalized()
    }
}
