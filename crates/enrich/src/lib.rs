//! Lead Qualification: profile enrichment
//!
//! Looks a contact up by email across an ordered list of [`ProfileSource`]s and
//! folds the answers into one [`EnrichmentPatch`]. The primary source is
//! [`ClearbitSource`]; [`PhantomBusterSource`] is consulted when the primary
//! has nothing, fails, or returns a profile without an avatar.
//!
//! Source failures and timeouts are logged and skipped, so
//! [`EnrichmentChain::enrich`] itself cannot fail. When no source has
//! credentials it returns [`EnrichmentPatch::placeholder`].
//!
//! ```no_run
//! use enrich::{EnrichConfig, EnrichmentChain};
//!
//! # async fn run() -> Result<(), enrich::EnrichError> {
//! let chain = EnrichmentChain::from_config(&EnrichConfig::default())?;
//! if let Some(patch) = chain.enrich("jane@techcorp.com").await {
//!     println!("{:?}", patch.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;

mod chain;
mod clearbit;
mod error;
mod http;
mod patch;
mod phantombuster;
mod source;

pub use crate::chain::EnrichmentChain;
pub use crate::clearbit::ClearbitSource;
pub use crate::config::{ClearbitConfig, EnrichConfig, PhantomBusterConfig};
pub use crate::error::EnrichError;
pub use crate::patch::EnrichmentPatch;
pub use crate::phantombuster::PhantomBusterSource;
pub use crate::source::ProfileSource;
