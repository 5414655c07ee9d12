//! Terminal provider: static local suggestions, never fails

use crate::tables::LocaleTables;
use crate::trends::{ProviderResult, RelatedQueries, TrendData, TrendProvider, TrendQuery};
use async_trait::async_trait;
use std::sync::Arc;

const MAX_SUGGESTIONS: usize = 8;

pub struct LocalSuggestionsProvider {
    tables: Arc<LocaleTables>,
}

impl LocalSuggestionsProvider {
    pub fn new(tables: Arc<LocaleTables>) -> Self {
        Self { tables }
    }

    /// Keyword-bucketed suggestions, generic ones when no table matches
    pub fn suggest(&self, query: &TrendQuery) -> TrendData {
        let suggestions: Vec<String> = self
            .tables
            .local_suggestions(&query.locale, &query.keyword)
            .map(|queries| {
                queries
                    .into_iter()
                    .take(MAX_SUGGESTIONS)
                    .map(|q| q.query)
                    .collect()
            })
            .filter(|s: &Vec<String>| !s.is_empty())
            .unwrap_or_else(|| generic_suggestions(&query.keyword));

        TrendData {
            keyword: query.keyword.clone(),
            interest_data: "Suggestions from the local table".to_string(),
            related_queries: RelatedQueries {
                message: Some(format!(
                    "Local suggestions for '{}' (no trend provider available)",
                    query.keyword
                )),
                ..RelatedQueries::default()
            },
            suggestions,
        }
    }
}

fn generic_suggestions(keyword: &str) -> Vec<String> {
    ["analysis", "trends", "market", "price"]
        .iter()
        .map(|suffix| format!("{} {}", keyword, suffix))
        .collect()
}

#[async_trait]
impl TrendProvider for LocalSuggestionsProvider {
    async fn fetch(&self, query: &TrendQuery) -> ProviderResult {
        ProviderResult::Success(self.suggest(query))
    }

    fn name(&self) -> &str {
        "local_suggestions"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Locale;

    #[test]
    fn test_bucketed_suggestions() {
        let provider = LocalSuggestionsProvider::new(Arc::new(LocaleTables::default()));
        let data = provider.suggest(&TrendQuery::new("borsa", Locale::new("TR")));
        assert_eq!(data.suggestions[0], "borsa istanbul");
        assert!(data.suggestions.len() <= MAX_SUGGESTIONS);
    }

    #[test]
    fn test_templated_default() {
        let provider = LocalSuggestionsProvider::new(Arc::new(LocaleTables::default()));
        let data = provider.suggest(&TrendQuery::new("coffee", Locale::new("US")));
        assert_eq!(data.suggestions, vec!["coffee price", "coffee market", "coffee news"]);
    }

    #[test]
    fn test_succeeds_without_tables() {
        let mut tables = LocaleTables::default();
        tables.local_suggestions.clear();
        let provider = LocalSuggestionsProvider::new(Arc::new(tables));

        let query = TrendQuery::new("tea", Locale::new("JP"));
        let ProviderResult::Success(data) = tokio_test::block_on(provider.fetch(&query)) else {
            panic!("local provider must not fail");
        };
        assert_eq!(data.suggestions.len(), 4);
        assert_eq!(data.suggestions[0], "tea analysis");
    }
}
