//! YAML configuration for the lead qualification pipeline.
//!
//! Every section is optional and falls back to its defaults. Secrets are not
//! read from the file: [`LeadQualConfig::apply_env`] pulls them from the
//! environment variables named in the `secrets` section.
//!
//! ## Example
//!
//! ```yaml
//! version: "1.0"
//! log_level: "info"
//! log_json: false
//!
//! embedding:
//!   mode: "api"
//!   model_name: "text-embedding-3-small"
//!   dimensions: 1536
//!   retry_config:
//!     max_retries: 2
//!     base_delay: 250
//!     max_delay: 2000
//!     jitter: true
//!
//! generation:
//!   model_name: "gpt-4o"
//!   max_tokens: 120
//!   temperature: 0.7
//!
//! enrichment:
//!   source_timeout_secs: 60
//!   phantombuster:
//!     poll_attempts: 10
//!     poll_interval_ms: 5000
//!
//! scoring:
//!   chunk_size: 5
//!   ideal_customer_profile: >
//!     VP or Director of Engineering at a Series B+ SaaS company.
//! ```

use std::fs;
use std::path::Path;

use enrich::EnrichConfig;
use scoring::ScoringConfig;
use semantic::{bearer, GenerationConfig, SemanticConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct LeadQualConfig {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub embedding: SemanticConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub enrichment: EnrichConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub secrets: SecretEnv,

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_json: bool,
}

/// Names of the environment variables holding provider credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SecretEnv {
    pub openai_api_key: String,
    pub clearbit_api_key: String,
    pub phantombuster_api_key: String,
    pub phantombuster_agent_id: String,
}

/// Older deployments name the agent variable this way; read when the
/// configured name is unset.
const LEGACY_PHANTOMBUSTER_AGENT_ENV: &str = "PHANTOMBUSTER_AGENT_ID";

impl Default for SecretEnv {
    fn default() -> Self {
        Self {
            openai_api_key: "OPENAI_API_KEY".into(),
            clearbit_api_key: "CLEARBIT_API_KEY".into(),
            phantombuster_api_key: "PHANTOMBUSTER_API_KEY".into(),
            phantombuster_agent_id: "PHANTOMBUSTER_ACTOR_ID".into(),
        }
    }
}

impl Default for LeadQualConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            name: None,
            embedding: SemanticConfig::default(),
            generation: GenerationConfig::default(),
            enrichment: EnrichConfig::default(),
            scoring: ScoringConfig::default(),
            secrets: SecretEnv::default(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl LeadQualConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML. An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: LeadQualConfig = if yaml.trim().is_empty() {
            LeadQualConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }

        validate_mode("embedding.mode", &self.embedding.mode)?;
        validate_mode("generation.mode", &self.generation.mode)?;

        if self.embedding.dimensions == Some(0) {
            return Err(ConfigLoadError::Validation(
                "embedding.dimensions must be >= 1".to_string(),
            ));
        }
        if self.generation.max_tokens == 0 {
            return Err(ConfigLoadError::Validation(
                "generation.max_tokens must be >= 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigLoadError::Validation(
                "generation.temperature must be within 0.0..=2.0".to_string(),
            ));
        }
        if self.scoring.chunk_size == 0 {
            return Err(ConfigLoadError::Validation(
                "scoring.chunk_size must be >= 1".to_string(),
            ));
        }
        if self.enrichment.source_timeout_secs == 0 {
            return Err(ConfigLoadError::Validation(
                "enrichment.source_timeout_secs must be >= 1".to_string(),
            ));
        }
        if self.enrichment.phantombuster.poll_attempts == 0 {
            return Err(ConfigLoadError::Validation(
                "enrichment.phantombuster.poll_attempts must be >= 1".to_string(),
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "log_level must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Fill credentials from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_secrets(|name| std::env::var(name).ok());
    }

    /// Fill credentials through `lookup`, which maps a variable name to its
    /// value. Values already present in the config are kept.
    pub fn apply_secrets<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(&self.secrets.openai_api_key) {
            let header = bearer(key.trim());
            self.embedding
                .api_auth_header
                .get_or_insert_with(|| header.clone());
            self.generation.api_auth_header.get_or_insert(header);
        }
        if let Some(key) = get(&self.secrets.clearbit_api_key) {
            self.enrichment.clearbit.api_key.get_or_insert(key);
        }
        if let Some(key) = get(&self.secrets.phantombuster_api_key) {
            self.enrichment.phantombuster.api_key.get_or_insert(key);
        }
        if let Some(agent) = get(&self.secrets.phantombuster_agent_id)
            .or_else(|| get(LEGACY_PHANTOMBUSTER_AGENT_ENV))
        {
            self.enrichment.phantombuster.agent_id.get_or_insert(agent);
        }
    }
}

fn validate_mode(field: &str, mode: &str) -> Result<(), ConfigLoadError> {
    match mode {
        "api" | "fast" => Ok(()),
        other => Err(ConfigLoadError::Validation(format!(
            "{field} must be \"api\" or \"fast\", got \"{other}\""
        ))),
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
