use serde::{Deserialize, Serialize};

/// Description of the buyer a lead is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdealCustomerProfile(String);

impl IdealCustomerProfile {
    pub const DEFAULT_DESCRIPTION: &'static str = "A decision maker (Director level or above) \
from a mid to large-sized company in the technology, finance, or healthcare industries. \
They have budget authority and are actively looking for solutions to improve their business \
operations. They're interested in innovation and improving efficiency.";

    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    pub fn from_industry(industry: &str, use_case: &str) -> Self {
        Self(format!(
            "Ideal customer profile for {industry} with use case: {use_case}"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Caller criteria when given and non-blank, otherwise this profile.
    pub fn resolve<'a>(&'a self, criteria: Option<&'a str>) -> &'a str {
        match criteria.map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => self.as_str(),
        }
    }
}

impl Default for IdealCustomerProfile {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DESCRIPTION)
    }
}
