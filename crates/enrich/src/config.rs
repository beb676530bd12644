use serde::{Deserialize, Serialize};

/// Settings for the primary (Clearbit Person) source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClearbitConfig {
    /// Secret key; the source counts as unconfigured while this is `None`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ClearbitConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://person.clearbit.com".into(),
            request_timeout_secs: 10,
        }
    }
}

impl ClearbitConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Settings for the fallback (PhantomBuster agent) source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhantomBusterConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub agent_id: Option<String>,
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// How many times the agent output is fetched before giving up.
    pub poll_attempts: u32,
    /// Pause before each fetch.
    pub poll_interval_ms: u64,
}

impl Default for PhantomBusterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            agent_id: None,
            base_url: "https://api.phantombuster.com".into(),
            request_timeout_secs: 10,
            poll_attempts: 10,
            poll_interval_ms: 5_000,
        }
    }
}

impl PhantomBusterConfig {
    pub fn with_credentials(mut self, key: impl Into<String>, agent_id: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_polling(mut self, attempts: u32, interval_ms: u64) -> Self {
        self.poll_attempts = attempts;
        self.poll_interval_ms = interval_ms;
        self
    }
}

/// Enrichment chain settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnrichConfig {
    /// Upper bound for one source lookup, polling included.
    pub source_timeout_secs: u64,
    pub clearbit: ClearbitConfig,
    pub phantombuster: PhantomBusterConfig,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            source_timeout_secs: 60,
            clearbit: ClearbitConfig::default(),
            phantombuster: PhantomBusterConfig::default(),
        }
    }
}

impl EnrichConfig {
    pub fn with_source_timeout_secs(mut self, secs: u64) -> Self {
        self.source_timeout_secs = secs;
        self
    }

    pub fn with_clearbit(mut self, clearbit: ClearbitConfig) -> Self {
        self.clearbit = clearbit;
        self
    }

    pub fn with_phantombuster(mut self, phantombuster: PhantomBusterConfig) -> Self {
        self.phantombuster = phantombuster;
        self
    }
}
