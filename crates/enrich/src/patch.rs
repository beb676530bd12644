use serde::{Deserialize, Serialize};

/// Partial contact profile returned by one enrichment source.
///
/// Every field is optional. Blank strings are treated as missing, so a source
/// that answers `"title": ""` never masks a later source's real title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "linkedIn", default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    /// Set on [`EnrichmentPatch::placeholder`] patches. Their title and bio are
    /// display text, not profile data.
    #[serde(skip)]
    pub synthetic: bool,
}

pub(crate) const PLACEHOLDER_TITLE: &str = "Unknown (enrichment provider not configured)";
pub(crate) const PLACEHOLDER_BIO: &str =
    "Real profile data requires Clearbit or PhantomBuster credentials.";

impl EnrichmentPatch {
    /// Fill every missing field of `self` from `other`. Fields `self` already
    /// holds are kept.
    pub fn merge(mut self, other: EnrichmentPatch) -> Self {
        fill(&mut self.first_name, other.first_name);
        fill(&mut self.last_name, other.last_name);
        fill(&mut self.avatar, other.avatar);
        fill(&mut self.title, other.title);
        fill(&mut self.company, other.company);
        fill(&mut self.location, other.location);
        fill(&mut self.industry, other.industry);
        fill(&mut self.bio, other.bio);
        fill(&mut self.linkedin_url, other.linkedin_url);
        self
    }

    pub fn has_avatar(&self) -> bool {
        present(&self.avatar)
    }

    pub fn is_empty(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.avatar,
            &self.title,
            &self.company,
            &self.location,
            &self.industry,
            &self.bio,
            &self.linkedin_url,
        ]
        .into_iter()
        .all(|field| !present(field))
    }

    /// Drop blank strings so they read as absent.
    pub(crate) fn normalized(self) -> Self {
        let synthetic = self.synthetic;
        EnrichmentPatch {
            synthetic,
            ..EnrichmentPatch::default().merge(self)
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.synthetic
    }

    /// Synthetic profile used when no provider has credentials.
    ///
    /// The avatar is a generated initials image for the email's local part and
    /// the company is the capitalized first label of the domain.
    pub fn placeholder(email: &str) -> Self {
        let (local, domain) = match email.split_once('@') {
            Some((local, domain)) => (local, Some(domain)),
            None => (email, None),
        };

        let name: String = url::form_urlencoded::byte_serialize(local.as_bytes()).collect();
        EnrichmentPatch {
            avatar: Some(format!(
                "https://ui-avatars.com/api/?name={name}&background=random"
            )),
            company: domain.and_then(company_from_domain),
            title: Some(PLACEHOLDER_TITLE.to_owned()),
            bio: Some(PLACEHOLDER_BIO.to_owned()),
            synthetic: true,
            ..EnrichmentPatch::default()
        }
    }
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if present(slot) {
        return;
    }
    *slot = value.filter(|v| !v.trim().is_empty());
}

fn company_from_domain(domain: &str) -> Option<String> {
    let label = domain.split('.').next()?.trim();
    let mut chars = label.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}
