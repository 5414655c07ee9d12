//! Domain probing: availability and registration lookups

pub mod checker;
pub mod validator;

// Re-export main functionality
pub use checker::NetworkProbe;
pub use validator::{normalize_keyword, split_domain, DomainValidator};

use crate::error::{Result, SeoForgeError};
use crate::types::{AvailabilityReport, AvailabilityStatus, WhoisRecord};
use async_trait::async_trait;

/// Answers whether a domain is registered, available or unknown
#[async_trait]
pub trait AvailabilityProbe: Send + Sync {
    /// Probe a single domain
    async fn probe(&self, domain: &str) -> Result<AvailabilityReport>;

    /// Get the probe name
    fn name(&self) -> &str;
}

/// Registration data lookup used for domain age and single-domain checks
#[async_trait]
pub trait WhoisProbe: Send + Sync {
    /// Look up registration data; `Err` when the registry could not be queried
    async fn whois(&self, domain: &str) -> Result<WhoisRecord>;
}

/// Probe that never touches the network
///
/// Every domain is `unknown` and WHOIS always fails, so ages fall back to
/// simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProbe;

impl OfflineProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AvailabilityProbe for OfflineProbe {
    async fn probe(&self, _domain: &str) -> Result<AvailabilityReport> {
        Ok(AvailabilityReport::new(
            AvailabilityStatus::Unknown,
            "offline mode; availability not checked",
        ))
    }

    fn name(&self) -> &str {
        "offline"
    }
}

#[async_trait]
impl WhoisProbe for OfflineProbe {
    async fn whois(&self, domain: &str) -> Result<WhoisRecord> {
        Err(SeoForgeError::probe_unavailable(
            domain,
            "offline mode",
            Some("whois".to_string()),
        ))
    }
}
