use std::sync::Arc;

use async_trait::async_trait;

use crate::{EnrichError, EnrichmentPatch};

/// One place a contact profile can be looked up by email.
///
/// `Ok(None)` means the provider answered and had no match. Errors are for
/// transport, status and decoding failures.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Whether credentials are present. Unconfigured sources are skipped.
    fn is_configured(&self) -> bool;

    async fn lookup(&self, email: &str) -> Result<Option<EnrichmentPatch>, EnrichError>;
}

#[async_trait]
impl<T: ProfileSource + ?Sized> ProfileSource for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }

    async fn lookup(&self, email: &str) -> Result<Option<EnrichmentPatch>, EnrichError> {
        (**self).lookup(email).await
    }
}
