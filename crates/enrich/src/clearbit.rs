use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::ClearbitConfig;
use crate::http::{build_client, join_url, status_error};
use crate::source::ProfileSource;
use crate::{EnrichError, EnrichmentPatch};

const FIND_PATH: &str = "/v2/people/find";

/// Primary source: Clearbit Person lookup by email.
#[derive(Debug, Clone)]
pub struct ClearbitSource {
    client: reqwest::Client,
    api_key: Option<String>,
    url: String,
}

impl ClearbitSource {
    pub fn new(cfg: &ClearbitConfig) -> Result<Self, EnrichError> {
        Ok(Self {
            client: build_client(cfg.request_timeout_secs)?,
            api_key: cfg.api_key.clone().filter(|k| !k.trim().is_empty()),
            url: join_url(&cfg.base_url, FIND_PATH),
        })
    }
}

#[async_trait]
impl ProfileSource for ClearbitSource {
    fn name(&self) -> &str {
        "clearbit"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn lookup(&self, email: &str) -> Result<Option<EnrichmentPatch>, EnrichError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(EnrichError::MissingCredentials("clearbit"))?;

        let response = self
            .client
            .get(&self.url)
            .query(&[("email", email)])
            .bearer_auth(key)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            // Lookup queued on Clearbit's side; nothing to merge yet.
            StatusCode::ACCEPTED => return Ok(None),
            status if !status.is_success() => return Err(status_error(response).await),
            _ => {}
        }

        let person: ClearbitPerson = response
            .json()
            .await
            .map_err(|e| EnrichError::MalformedResponse(format!("clearbit person: {e}")))?;
        let patch = person.into_patch();
        Ok((!patch.is_empty()).then_some(patch))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ClearbitPerson {
    name: Option<PersonName>,
    employment: Option<Employment>,
    avatar: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    linkedin: Option<Handle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PersonName {
    given_name: Option<String>,
    family_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Employment {
    title: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Handle {
    handle: Option<String>,
}

impl ClearbitPerson {
    fn into_patch(self) -> EnrichmentPatch {
        let name = self.name.unwrap_or_default();
        let employment = self.employment.unwrap_or_default();
        let linkedin_url = self
            .linkedin
            .and_then(|l| l.handle)
            .filter(|h| !h.trim().is_empty())
            .map(|h| format!("https://www.linkedin.com/{}", h.trim_start_matches('/')));

        EnrichmentPatch {
            first_name: name.given_name,
            last_name: name.family_name,
            avatar: self.avatar,
            title: employment.title,
            company: employment.name,
            location: self.location,
            bio: self.bio,
            linkedin_url,
            ..EnrichmentPatch::default()
        }
        .normalized()
    }
}
