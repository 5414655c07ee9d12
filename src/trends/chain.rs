//! Ordered provider fallback

use crate::config::Settings;
use crate::seo::Simulation;
use crate::tables::LocaleTables;
use crate::trends::providers::{
    GoogleTrendsProvider, LocalSuggestionsProvider, RelatedEstimatesProvider,
    RisingEstimatesProvider, TrendSource,
};
use crate::trends::{ProviderResult, RelatedQueries, TrendData, TrendProvider, TrendQuery};
use crate::types::Locale;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// A provider that did not answer, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: String,
}

/// Merged answer of the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub keyword: String,
    pub country: Locale,
    pub related_queries: RelatedQueries,
    pub interest_data: String,
    pub suggestions: Vec<String>,
    /// Name of the provider that answered
    pub api_used: String,
    pub debug_info: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ProviderFailure>,
}

impl TrendReport {
    fn from_data(query: &TrendQuery, data: TrendData, api_used: &str, debug_info: String, failures: Vec<ProviderFailure>) -> Self {
        Self {
            keyword: data.keyword,
            country: query.locale.clone(),
            related_queries: data.related_queries,
            interest_data: data.interest_data,
            suggestions: data.suggestions,
            api_used: api_used.to_string(),
            debug_info,
            failures,
        }
    }
}

/// Providers in priority order, then a terminal provider that always answers
pub struct FallbackChain {
    providers: Vec<Box<dyn TrendProvider>>,
    terminal: LocalSuggestionsProvider,
}

impl FallbackChain {
    /// Chain with only the terminal provider
    pub fn new(terminal: LocalSuggestionsProvider) -> Self {
        Self {
            providers: Vec::new(),
            terminal,
        }
    }

    /// Google Trends, related estimates, rising estimates, local suggestions
    pub fn standard(
        tables: Arc<LocaleTables>,
        source: Arc<dyn TrendSource>,
        simulation: Simulation,
        settings: &Settings,
    ) -> Self {
        let google = GoogleTrendsProvider::new(source, Arc::clone(&tables))
            .with_delays(settings.trend_delay(), settings.related_delay());

        Self::new(LocalSuggestionsProvider::new(Arc::clone(&tables)))
            .with_provider(Box::new(google))
            .with_provider(Box::new(RelatedEstimatesProvider::new(Arc::clone(&tables), simulation)))
            .with_provider(Box::new(RisingEstimatesProvider::new(tables, simulation)))
    }

    /// Table-backed estimates and local suggestions only, no network
    pub fn offline(tables: Arc<LocaleTables>, simulation: Simulation) -> Self {
        Self::new(LocalSuggestionsProvider::new(Arc::clone(&tables)))
            .with_provider(Box::new(RelatedEstimatesProvider::new(Arc::clone(&tables), simulation)))
            .with_provider(Box::new(RisingEstimatesProvider::new(tables, simulation)))
    }

    /// Append a provider after the existing ones
    pub fn with_provider(mut self, provider: Box<dyn TrendProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Provider names in the order they are tried, terminal last
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers
            .iter()
            .map(|p| p.name())
            .chain(std::iter::once(self.terminal.name()))
            .collect()
    }

    /// First successful provider wins; never fails
    pub async fn fetch(&self, keyword: &str, locale: &Locale) -> TrendReport {
        let query = TrendQuery::new(keyword, locale.clone());
        let overall_start = Instant::now();
        let mut failures = Vec::new();

        for (position, provider) in self.providers.iter().enumerate() {
            let start_time = Instant::now();
            match provider.fetch(&query).await {
                ProviderResult::Success(data) => {
                    tracing::info!(
                        provider = %provider.name(),
                        fallback_used = position > 0,
                        duration_ms = %overall_start.elapsed().as_millis(),
                        "Trend data fetched"
                    );
                    let debug_info = format!("{} succeeded", provider.name());
                    return TrendReport::from_data(&query, data, provider.name(), debug_info, failures);
                }
                ProviderResult::Failure { error } => {
                    tracing::warn!(
                        provider = %provider.name(),
                        error = %error,
                        duration_ms = %start_time.elapsed().as_millis(),
                        "Trend provider failed"
                    );
                    failures.push(ProviderFailure {
                        provider: provider.name().to_string(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            provider = %self.terminal.name(),
            fallback_used = true,
            duration_ms = %overall_start.elapsed().as_millis(),
            "All trend providers failed, using local suggestions"
        );

        let debug_info = if failures.is_empty() {
            format!("{} used", self.terminal.name())
        } else {
            format!("all providers failed; {} used", self.terminal.name())
        };
        let data = self.terminal.suggest(&query);
        TrendReport::from_data(&query, data, self.terminal.name(), debug_info, failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        name: &'static str,
        succeed: bool,
        calls: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn boxed(name: &'static str, succeed: bool, calls: &Arc<AtomicUsize>) -> Box<dyn TrendProvider> {
            Box::new(Self {
                name,
                succeed,
                calls: Arc::clone(calls),
            })
        }
    }

    #[async_trait]
    impl TrendProvider for Scripted {
        async fn fetch(&self, query: &TrendQuery) -> ProviderResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                ProviderResult::Success(TrendData {
                    keyword: query.keyword.clone(),
                    interest_data: format!("from {}", self.name),
                    related_queries: RelatedQueries::default(),
                    suggestions: vec![self.name.to_string()],
                })
            } else {
                ProviderResult::failure(format!("{} is down", self.name))
            }
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn terminal() -> LocalSuggestionsProvider {
        LocalSuggestionsProvider::new(Arc::new(LocaleTables::default()))
    }

    #[tokio::test]
    async fn test_third_provider_answers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = FallbackChain::new(terminal())
            .with_provider(Scripted::boxed("first", false, &calls))
            .with_provider(Scripted::boxed("second", false, &calls))
            .with_provider(Scripted::boxed("third", true, &calls))
            .with_provider(Scripted::boxed("fourth", true, &calls));

        let report = chain.fetch("altın", &Locale::new("TR")).await;
        assert_eq!(report.api_used, "third");
        assert_eq!(report.suggestions, vec!["third"]);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_answers_when_all_fail() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = FallbackChain::new(terminal())
            .with_provider(Scripted::boxed("first", false, &calls))
            .with_provider(Scripted::boxed("second", false, &calls))
            .with_provider(Scripted::boxed("third", false, &calls));

        let report = chain.fetch("altın", &Locale::new("TR")).await;
        assert_eq!(report.api_used, "local_suggestions");
        assert_eq!(report.suggestions[0], "altın fiyatı");
        assert_eq!(report.failures.len(), 3);
        assert!(report.debug_info.contains("all providers failed"));
    }

    #[tokio::test]
    async fn test_report_serialization() {
        let report = FallbackChain::new(terminal()).fetch("gold", &Locale::new("us")).await;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["country"], "US");
        assert_eq!(json["api_used"], "local_suggestions");
        assert!(json.get("failures").is_none());
    }

    #[test]
    fn test_standard_order() {
        struct NoSource;

        #[async_trait]
        impl TrendSource for NoSource {
            async fn interest_over_time(&self, _: &str, _: &str, _: &str) -> crate::error::Result<Vec<u32>> {
                Ok(Vec::new())
            }

            async fn related_queries(&self, _: &str, _: &str, _: &str) -> crate::error::Result<RelatedQueries> {
                Ok(RelatedQueries::default())
            }
        }

        let chain = FallbackChain::standard(
            Arc::new(LocaleTables::default()),
            Arc::new(NoSource),
            Simulation::seeded(1),
            &Settings::without_delays(),
        );
        assert_eq!(
            chain.provider_names(),
            vec!["google_trends", "related_estimates", "rising_estimates", "local_suggestions"]
        );
    }

    #[tokio::test]
    async fn test_offline_chain_uses_estimates() {
        let chain = FallbackChain::offline(Arc::new(LocaleTables::default()), Simulation::seeded(3));
        assert_eq!(
            chain.provider_names(),
            vec!["related_estimates", "rising_estimates", "local_suggestions"]
        );

        let report = chain.fetch("altın", &Locale::new("TR")).await;
        assert_eq!(report.api_used, "related_estimates");
        assert!(report.failures.is_empty());
        assert_eq!(report.related_queries.top[0].query, "altın fiyatı");
    }
}
