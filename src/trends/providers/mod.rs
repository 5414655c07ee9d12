//! Trend provider implementations

pub mod estimates;
pub mod google;
pub mod local;

pub use estimates::{RelatedEstimatesProvider, RisingEstimatesProvider};
pub use google::{GoogleTrendsClient, GoogleTrendsProvider, TrendSource};
pub use local::LocalSuggestionsProvider;

use crate::tables::CannedQuery;
use crate::trends::QueryValue;
use rand::Rng;

/// Canned queries with popularity; missing values drawn from 30..=90
pub(crate) fn to_query_values<R: Rng + ?Sized>(
    queries: &[CannedQuery],
    max: usize,
    rng: &mut R,
) -> Vec<QueryValue> {
    queries
        .iter()
        .take(max)
        .map(|q| {
            let value = q.value.unwrap_or_else(|| rng.gen_range(30..=90));
            QueryValue::new(q.query.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_to_query_values() {
        let queries = vec![
            CannedQuery {
                query: "gold price".to_string(),
                value: Some(75),
            },
            CannedQuery {
                query: "gold market".to_string(),
                value: None,
            },
            CannedQuery {
                query: "gold news".to_string(),
                value: None,
            },
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let values = to_query_values(&queries, 2, &mut rng);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], QueryValue::new("gold price", 75));
        assert!((30..=90).contains(&values[1].value));
    }
}
