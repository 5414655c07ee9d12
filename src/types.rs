//! Core types and structures for seo-forge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Two-letter country code selecting locale tables (stored upper-case)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    /// Whether this is a usable geo code for trend queries
    pub fn is_geo(&self) -> bool {
        self.0.len() == 2 && self.0.chars().all(|c| c.is_ascii_alphabetic())
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("TR")
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Domain availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Registered,
    Available,
    Unknown,
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AvailabilityStatus::Registered => write!(f, "registered"),
            AvailabilityStatus::Available => write!(f, "available"),
            AvailabilityStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Answer of an availability probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub status: AvailabilityStatus,
    pub note: String,
}

impl AvailabilityReport {
    pub fn new(status: AvailabilityStatus, note: impl Into<String>) -> Self {
        Self {
            status,
            note: note.into(),
        }
    }
}

/// Registration data returned by a WHOIS probe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhoisRecord {
    /// Whether the registry reported the name as registered
    pub registered: bool,
    pub registrar: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
}

/// Named contribution to the aggregate SEO score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    KeywordMatch,
    ExtensionScore,
    LengthScore,
    CharacterScore,
    Pronounceable,
    BacklinkQuality,
    DomainAge,
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Factor::KeywordMatch => "keyword_match",
            Factor::ExtensionScore => "extension_score",
            Factor::LengthScore => "length_score",
            Factor::CharacterScore => "character_score",
            Factor::Pronounceable => "pronounceable",
            Factor::BacklinkQuality => "backlink_quality",
            Factor::DomainAge => "domain_age",
        };
        write!(f, "{}", name)
    }
}

/// Union of all factor contributions for one candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreFactors(BTreeMap<Factor, u32>);

impl ScoreFactors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, factor: Factor, score: u32) {
        self.0.insert(factor, score);
    }

    pub fn get(&self, factor: Factor) -> Option<u32> {
        self.0.get(&factor).copied()
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

}

/// Age estimate for a domain, either read from WHOIS or simulated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainAge {
    pub years: f64,
    /// Human readable form, "~" prefixed when simulated
    pub label: String,
    pub score: u32,
    /// `YYYY-MM-DD`
    pub creation_date: String,
    pub simulated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Simulated backlink figures for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklinkProfile {
    pub backlinks: u64,
    pub quality_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referring_domains: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_authority: Option<u32>,
}

/// Fully scored candidate; the unit of ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainAssessment {
    pub domain: String,
    pub status: AvailabilityStatus,
    pub availability_note: String,
    pub factors: ScoreFactors,
    pub seo_score: u32,
    pub keyword_relevance: u32,
    pub backlink_estimate: u64,
    pub domain_age: DomainAge,
    pub estimated_value: String,
}

/// Result row of the backlink threshold search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklinkDomain {
    #[serde(flatten)]
    pub assessment: DomainAssessment,
    pub available: bool,
    pub quality_score: u32,
    pub referring_domains: u64,
    pub domain_authority: u32,
}
