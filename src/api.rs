//! Caller-facing operations
//!
//! Every operation answers with an [`Envelope`]: `{success: true, ...}` on
//! success or `{success: false, error}` on failure. None of them return `Err`.

use crate::config::Settings;
use crate::domain::{AvailabilityProbe, DomainValidator, NetworkProbe, OfflineProbe, WhoisProbe};
use crate::error::{Result, SeoForgeError};
use crate::seo::{RankingPipeline, Simulation};
use crate::trends::providers::GoogleTrendsClient;
use crate::trends::{FallbackChain, TrendReport};
use crate::types::{BacklinkDomain, DomainAssessment, Locale};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Extension appended by [`SeoForge::check_domain`] to bare names
pub const DEFAULT_CHECK_EXTENSION: &str = "com";

fn default_seo_limit() -> usize {
    10
}

fn default_backlink_limit() -> usize {
    15
}

fn default_min_backlinks() -> u64 {
    100
}

/// Success/failure wrapper around an operation's payload
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }

    fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoSearchRequest {
    pub keyword: String,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_seo_limit")]
    pub limit: usize,
}

impl SeoSearchRequest {
    pub fn new(keyword: impl Into<String>, locale: Locale) -> Self {
        Self {
            keyword: keyword.into(),
            locale,
            limit: default_seo_limit(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoSearchResult {
    pub keyword: String,
    pub locale: Locale,
    pub total_found: usize,
    pub domains: Vec<DomainAssessment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklinkSearchRequest {
    pub keyword: String,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_min_backlinks")]
    pub min_backlinks: u64,
    #[serde(default = "default_backlink_limit")]
    pub limit: usize,
}

impl BacklinkSearchRequest {
    pub fn new(keyword: impl Into<String>, locale: Locale) -> Self {
        Self {
            keyword: keyword.into(),
            locale,
            min_backlinks: default_min_backlinks(),
            limit: default_backlink_limit(),
        }
    }

    pub fn with_min_backlinks(mut self, min_backlinks: u64) -> Self {
        self.min_backlinks = min_backlinks;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklinkSearchResult {
    pub keyword: String,
    pub locale: Locale,
    pub min_backlinks: u64,
    pub total_found: usize,
    pub domains: Vec<BacklinkDomain>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendRequest {
    pub keyword: String,
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    pub domain: String,
}

/// Registration details of a checked domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckDetails {
    pub registrar: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCheck {
    pub domain: String,
    /// "registered", "available" or "possibly available"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<CheckDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Entry point tying the pipeline, WHOIS and the trend chain together
pub struct SeoForge {
    pipeline: RankingPipeline,
    whois: Arc<dyn WhoisProbe>,
    trends: FallbackChain,
    validator: DomainValidator,
}

impl SeoForge {
    pub fn new(pipeline: RankingPipeline, whois: Arc<dyn WhoisProbe>, trends: FallbackChain) -> Self {
        Self {
            pipeline,
            whois,
            trends,
            validator: DomainValidator::new(),
        }
    }

    /// DNS/WHOIS probing and Google Trends first in the chain
    pub fn online(settings: &Settings) -> Result<Self> {
        let tables = Arc::new(settings.load_tables()?);
        let simulation = Simulation::from_option(settings.seed);
        let probe = Arc::new(NetworkProbe::with_timeout(settings.probe_timeout()));
        let availability: Arc<dyn AvailabilityProbe> = probe.clone();
        let whois: Arc<dyn WhoisProbe> = probe;

        let pipeline = RankingPipeline::new(Arc::clone(&tables), availability, Arc::clone(&whois))
            .with_simulation(simulation)
            .with_probe_delay(settings.probe_delay());
        let source = Arc::new(GoogleTrendsClient::new(settings.probe_timeout())?);
        let trends = FallbackChain::standard(tables, source, simulation, settings);

        Ok(Self::new(pipeline, whois, trends))
    }

    /// No network access: availability is unknown, ages and trends simulated
    pub fn offline(settings: &Settings) -> Result<Self> {
        let tables = Arc::new(settings.load_tables()?);
        let simulation = Simulation::from_option(settings.seed);
        let probe = Arc::new(OfflineProbe::new());

        let pipeline = RankingPipeline::new(Arc::clone(&tables), probe.clone(), probe.clone())
            .with_simulation(simulation)
            .with_probe_delay(settings.probe_delay());
        let trends = FallbackChain::offline(tables, simulation);

        Ok(Self::new(pipeline, probe, trends))
    }

    pub fn from_settings(settings: &Settings, offline: bool) -> Result<Self> {
        if offline {
            Self::offline(settings)
        } else {
            Self::online(settings)
        }
    }

    pub fn simulation(&self) -> Simulation {
        self.pipeline.simulation()
    }

    /// Domains ranked by SEO value for a keyword
    pub async fn find_seo_domains(&self, request: &SeoSearchRequest) -> Envelope<SeoSearchResult> {
        let result = self
            .pipeline
            .seo_search(&request.keyword, &request.locale, request.limit)
            .await
            .map(|domains| SeoSearchResult {
                keyword: request.keyword.clone(),
                locale: request.locale.clone(),
                total_found: domains.len(),
                domains,
            });

        if let Err(e) = &result {
            tracing::warn!(keyword = %request.keyword, error = %e, "SEO search failed");
        }
        Envelope::from_result(result)
    }

    /// Simulated-available domains with at least `min_backlinks`
    pub async fn find_backlink_domains(&self, request: &BacklinkSearchRequest) -> Envelope<BacklinkSearchResult> {
        let result = self
            .pipeline
            .backlink_search(&request.keyword, &request.locale, request.min_backlinks, request.limit)
            .await
            .map(|domains| BacklinkSearchResult {
                keyword: request.keyword.clone(),
                locale: request.locale.clone(),
                min_backlinks: request.min_backlinks,
                total_found: domains.len(),
                domains,
            });

        if let Err(e) = &result {
            tracing::warn!(keyword = %request.keyword, error = %e, "Backlink search failed");
        }
        Envelope::from_result(result)
    }

    /// Trend data and suggestions from the first provider that answers
    pub async fn fetch_keyword_trends(&self, request: &TrendRequest) -> Envelope<TrendReport> {
        let keyword = request.keyword.trim();
        if keyword.is_empty() {
            return Envelope::failed(SeoForgeError::validation("keyword is required").to_string());
        }

        Envelope::ok(self.trends.fetch(keyword, &request.locale).await)
    }

    /// WHOIS lookup for one name; bare names get `.com`
    pub async fn check_domain(&self, request: &CheckRequest) -> Envelope<DomainCheck> {
        let domain = match self.qualify(&request.domain) {
            Ok(domain) => domain,
            Err(e) => return Envelope::failed(e.to_string()),
        };

        let check = match self.whois.whois(&domain).await {
            Ok(record) if record.registered => DomainCheck {
                domain,
                status: "registered".to_string(),
                details: Some(CheckDetails {
                    registrar: record.registrar,
                    creation_date: record.creation_date,
                    expiration_date: record.expiration_date,
                }),
                note: None,
            },
            Ok(_) => DomainCheck {
                domain,
                status: "available".to_string(),
                details: None,
                note: Some("registry has no record".to_string()),
            },
            Err(e) => {
                tracing::debug!(domain = %domain, error = %e, "WHOIS lookup failed");
                DomainCheck {
                    domain,
                    status: "possibly available".to_string(),
                    details: None,
                    note: Some("WHOIS lookup failed; verify manually with a registrar".to_string()),
                }
            }
        };

        Envelope::ok(check)
    }

    fn qualify(&self, name: &str) -> Result<String> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(SeoForgeError::validation("domain is required"));
        }

        let domain = if name.contains('.') {
            name
        } else {
            format!("{}.{}", name, DEFAULT_CHECK_EXTENSION)
        };
        Ok(self.validator.validate(&domain)?.get_full_domain())
    }
}
