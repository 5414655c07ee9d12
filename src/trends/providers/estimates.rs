//! Table-backed related and rising query estimates
//!
//! Stand-ins for paid keyword tools: locale/keyword matched canned queries
//! plus a simulated search volume.

use crate::seo::Simulation;
use crate::tables::LocaleTables;
use crate::trends::providers::to_query_values;
use crate::trends::{ProviderResult, RelatedQueries, TrendData, TrendProvider, TrendQuery};
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;

const MAX_TOP: usize = 5;
const MAX_RISING: usize = 6;

/// Secondary provider: top related queries
pub struct RelatedEstimatesProvider {
    tables: Arc<LocaleTables>,
    simulation: Simulation,
}

impl RelatedEstimatesProvider {
    pub fn new(tables: Arc<LocaleTables>, simulation: Simulation) -> Self {
        Self { tables, simulation }
    }
}

#[async_trait]
impl TrendProvider for RelatedEstimatesProvider {
    async fn fetch(&self, query: &TrendQuery) -> ProviderResult {
        let Some(queries) = self.tables.related_queries(&query.locale, &query.keyword) else {
            return ProviderResult::failure(format!("no related queries for locale {}", query.locale));
        };

        let mut rng = self
            .simulation
            .rng_for(&format!("{}:{}", self.name(), query.locale), &query.keyword);
        let top = to_query_values(&queries, MAX_TOP, &mut rng);
        if top.is_empty() {
            return ProviderResult::failure("related query table is empty");
        }

        let volume: u32 = rng.gen_range(1000..=50_000);
        ProviderResult::Success(TrendData {
            keyword: query.keyword.clone(),
            interest_data: format!("Estimated search volume: {}", volume),
            related_queries: RelatedQueries {
                top,
                rising: Vec::new(),
                message: Some("Related query estimates".to_string()),
            },
            suggestions: Vec::new(),
        })
    }

    fn name(&self) -> &str {
        "related_estimates"
    }
}

/// Tertiary provider: rising queries
pub struct RisingEstimatesProvider {
    tables: Arc<LocaleTables>,
    simulation: Simulation,
}

impl RisingEstimatesProvider {
    pub fn new(tables: Arc<LocaleTables>, simulation: Simulation) -> Self {
        Self { tables, simulation }
    }
}

#[async_trait]
impl TrendProvider for RisingEstimatesProvider {
    async fn fetch(&self, query: &TrendQuery) -> ProviderResult {
        let Some(queries) = self.tables.rising_queries(&query.locale, &query.keyword) else {
            return ProviderResult::failure(format!("no rising queries for locale {}", query.locale));
        };

        let mut rng = self
            .simulation
            .rng_for(&format!("{}:{}", self.name(), query.locale), &query.keyword);
        let rising = to_query_values(&queries, MAX_RISING, &mut rng);
        if rising.is_empty() {
            return ProviderResult::failure("rising query table is empty");
        }

        let volume: u32 = rng.gen_range(500..=25_000);
        ProviderResult::Success(TrendData {
            keyword: query.keyword.clone(),
            interest_data: format!("Estimated monthly searches: {}", volume),
            related_queries: RelatedQueries {
                top: Vec::new(),
                rising,
                message: Some("Rising query estimates".to_string()),
            },
            suggestions: Vec::new(),
        })
    }

    fn name(&self) -> &str {
        "rising_estimates"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Locale;

    fn tables() -> Arc<LocaleTables> {
        Arc::new(LocaleTables::default())
    }

    #[tokio::test]
    async fn test_related_tr_topic() {
        let provider = RelatedEstimatesProvider::new(tables(), Simulation::seeded(1));
        let result = provider.fetch(&TrendQuery::new("altın", Locale::new("TR"))).await;

        let ProviderResult::Success(data) = result else {
            panic!("expected success");
        };
        assert_eq!(data.related_queries.top.len(), 5);
        assert_eq!(data.related_queries.top[0].query, "altın fiyatı");
        assert_eq!(data.related_queries.top[0].value, 85);
    }

    #[tokio::test]
    async fn test_related_other_locale_uses_default() {
        let provider = RelatedEstimatesProvider::new(tables(), Simulation::seeded(1));
        let result = provider.fetch(&TrendQuery::new("tea", Locale::new("GB"))).await;

        let ProviderResult::Success(data) = result else {
            panic!("expected success");
        };
        assert_eq!(data.related_queries.top[0], crate::trends::QueryValue::new("tea price", 75));
    }

    #[tokio::test]
    async fn test_rising_values_and_reproducibility() {
        let provider = RisingEstimatesProvider::new(tables(), Simulation::seeded(5));
        let query = TrendQuery::new("gold", Locale::new("US"));

        let first = provider.fetch(&query).await;
        let second = provider.fetch(&query).await;
        assert_eq!(first, second);

        let ProviderResult::Success(data) = first else {
            panic!("expected success");
        };
        assert_eq!(data.related_queries.rising.len(), 4);
        assert!(data.related_queries.rising.iter().all(|q| (30..=90).contains(&q.value)));
    }

    #[tokio::test]
    async fn test_missing_locale_table_fails() {
        let mut tables = LocaleTables::default();
        tables.related_queries.clear();
        let provider = RelatedEstimatesProvider::new(Arc::new(tables), Simulation::seeded(1));
        let result = provider.fetch(&TrendQuery::new("gold", Locale::new("US"))).await;
        assert!(!result.is_success());
    }
}
