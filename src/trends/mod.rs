//! Keyword trend and related-query suggestions
//!
//! Providers are tried in priority order by [`FallbackChain`]; the first one
//! that produces data answers the request.

pub mod chain;
pub mod providers;

// Re-export main functionality
pub use chain::{FallbackChain, TrendReport};

use crate::types::Locale;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Keyword and locale a provider is asked about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendQuery {
    pub keyword: String,
    pub locale: Locale,
}

impl TrendQuery {
    pub fn new(keyword: impl Into<String>, locale: Locale) -> Self {
        Self {
            keyword: keyword.into(),
            locale,
        }
    }
}

/// One related search and its relative popularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryValue {
    pub query: String,
    pub value: u32,
}

impl QueryValue {
    pub fn new(query: impl Into<String>, value: u32) -> Self {
        Self {
            query: query.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedQueries {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top: Vec<QueryValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rising: Vec<QueryValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Payload of a successful provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendData {
    /// Keyword the data is about; may be a variant of the requested one
    pub keyword: String,
    /// Human readable interest summary
    pub interest_data: String,
    pub related_queries: RelatedQueries,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Outcome of one provider; failures are values, never errors
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult {
    Success(TrendData),
    Failure { error: String },
}

impl ProviderResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// A source in the fallback chain
#[async_trait]
pub trait TrendProvider: Send + Sync {
    /// Fetch trend data for a keyword
    async fn fetch(&self, query: &TrendQuery) -> ProviderResult;

    /// Get provider name
    fn name(&self) -> &str;
}
