use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tier::Tier;

pub type LeadId = i64;
pub type EventId = i64;

/// A captured contact, in the shape the CRUD layer stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub event_id: EventId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub score: Tier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_similarity_score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_score_explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "linkedIn", default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_source() -> String {
    "manual".into()
}

impl Lead {
    pub fn new(
        id: LeadId,
        event_id: EventId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            event_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            title: None,
            company: None,
            notes: None,
            score: Tier::default(),
            ai_similarity_score: None,
            ai_score_explanation: None,
            avatar: None,
            location: None,
            industry: None,
            bio: None,
            linkedin_url: None,
            source: default_source(),
            created_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Text that gets embedded and compared against the ideal customer.
    /// Fixed field order; missing title and company read "Unknown".
    pub fn profile_text(&self) -> String {
        format!(
            "Name: {} {}\nTitle: {}\nCompany: {}\nEmail: {}\nNotes: {}",
            self.first_name,
            self.last_name,
            non_blank(&self.title).unwrap_or("Unknown"),
            non_blank(&self.company).unwrap_or("Unknown"),
            self.email,
            non_blank(&self.notes).unwrap_or(""),
        )
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}
