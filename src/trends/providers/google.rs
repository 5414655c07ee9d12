//! Google Trends provider
//!
//! Tries every (timeframe, keyword variant) pair with a courtesy pause
//! between attempts and succeeds on the first one with non-zero interest.

use crate::error::{Result, SeoForgeError};
use crate::tables::LocaleTables;
use crate::trends::{ProviderResult, QueryValue, RelatedQueries, TrendData, TrendProvider, TrendQuery};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEFRAMES: &[&str] = &["today 12-m", "today 3-m"];
const MAX_RELATED: usize = 10;

/// Raw trend data source for one keyword, geo and timeframe
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Interest-over-time series
    async fn interest_over_time(&self, keyword: &str, geo: &str, timeframe: &str) -> Result<Vec<u32>>;

    /// Top and rising related queries
    async fn related_queries(&self, keyword: &str, geo: &str, timeframe: &str) -> Result<RelatedQueries>;
}

pub struct GoogleTrendsProvider {
    source: Arc<dyn TrendSource>,
    tables: Arc<LocaleTables>,
    timeframes: Vec<String>,
    attempt_delay: Duration,
    related_delay: Duration,
}

impl GoogleTrendsProvider {
    pub fn new(source: Arc<dyn TrendSource>, tables: Arc<LocaleTables>) -> Self {
        Self {
            source,
            tables,
            timeframes: DEFAULT_TIMEFRAMES.iter().map(|s| s.to_string()).collect(),
            attempt_delay: Duration::from_secs(2),
            related_delay: Duration::from_secs(1),
        }
    }

    /// Pauses between attempts and before the related-query request
    pub fn with_delays(mut self, attempt_delay: Duration, related_delay: Duration) -> Self {
        self.attempt_delay = attempt_delay;
        self.related_delay = related_delay;
        self
    }

    async fn collect(&self, variant: &str, geo: &str, timeframe: &str, total: u64) -> TrendData {
        sleep_unless_zero(self.related_delay).await;

        let mut related = match self.source.related_queries(variant, geo, timeframe).await {
            Ok(related) => related,
            Err(e) => {
                tracing::debug!(keyword = %variant, error = %e, "Related queries unavailable");
                RelatedQueries::default()
            }
        };
        related.top.truncate(MAX_RELATED);
        related.rising.truncate(MAX_RELATED);

        TrendData {
            keyword: variant.to_string(),
            interest_data: format!("Data available ({}), total interest: {}", timeframe, total),
            related_queries: related,
            suggestions: Vec::new(),
        }
    }
}

#[async_trait]
impl TrendProvider for GoogleTrendsProvider {
    async fn fetch(&self, query: &TrendQuery) -> ProviderResult {
        let geo = if query.locale.is_geo() { query.locale.code() } else { "" };
        let variants = self.tables.trend_variants(&query.locale, &query.keyword);
        let mut attempts = 0usize;

        for timeframe in &self.timeframes {
            for variant in &variants {
                if attempts > 0 {
                    sleep_unless_zero(self.attempt_delay).await;
                }
                attempts += 1;

                match self.source.interest_over_time(variant, geo, timeframe).await {
                    Ok(series) => {
                        let total: u64 = series.iter().map(|v| u64::from(*v)).sum();
                        if total > 0 {
                            return ProviderResult::Success(self.collect(variant, geo, timeframe, total).await);
                        }
                        tracing::debug!(keyword = %variant, timeframe = %timeframe, "No interest data");
                    }
                    Err(e) => {
                        tracing::debug!(keyword = %variant, timeframe = %timeframe, error = %e, "Trend attempt failed");
                    }
                }
            }
        }

        ProviderResult::failure(format!("no Google Trends data after {} attempts", attempts))
    }

    fn name(&self) -> &str {
        "google_trends"
    }
}

async fn sleep_unless_zero(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Client for the public Google Trends widget API
pub struct GoogleTrendsClient {
    client: Client,
    base_url: String,
    language: String,
}

impl GoogleTrendsClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("seo-forge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SeoForgeError::network(e.to_string(), None, None))?;

        Ok(Self {
            client,
            base_url: "https://trends.google.com/trends/api".to_string(),
            language: "en-US".to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve the widget for `widget_id` through the explore endpoint
    async fn widget(&self, keyword: &str, geo: &str, timeframe: &str, widget_id: &str) -> Result<Widget> {
        let req = serde_json::json!({
            "comparisonItem": [{ "keyword": keyword, "geo": geo, "time": timeframe }],
            "category": 0,
            "property": "",
        });

        let explore: ExploreResponse = self.get_json("explore", &req.to_string(), None).await?;
        explore
            .widgets
            .into_iter()
            .find(|w| w.id == widget_id)
            .ok_or_else(|| SeoForgeError::provider("google_trends", format!("explore returned no {} widget", widget_id)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, req: &str, token: Option<&str>) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let mut params = vec![("hl", self.language.as_str()), ("tz", "0"), ("req", req)];
        if let Some(token) = token {
            params.push(("token", token));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| SeoForgeError::network(format!("Failed to reach Google Trends: {}", e), None, Some(url.clone())))?;

        let status = response.status();
        if !status.is_success() {
            let message = match status.as_u16() {
                429 => "Rate limit exceeded (429). Please try again later".to_string(),
                _ => format!("Google Trends request failed ({})", status),
            };
            return Err(SeoForgeError::network(message, Some(status.as_u16()), Some(url)));
        }

        let body = response.text().await?;
        parse_guarded_json(&body)
    }
}

#[async_trait]
impl TrendSource for GoogleTrendsClient {
    async fn interest_over_time(&self, keyword: &str, geo: &str, timeframe: &str) -> Result<Vec<u32>> {
        let widget = self.widget(keyword, geo, timeframe, "TIMESERIES").await?;
        let data: MultilineResponse = self
            .get_json("widgetdata/multiline", &widget.request.to_string(), Some(&widget.token))
            .await?;

        Ok(data
            .default
            .timeline_data
            .iter()
            .map(|point| point.value.first().copied().unwrap_or(0))
            .collect())
    }

    async fn related_queries(&self, keyword: &str, geo: &str, timeframe: &str) -> Result<RelatedQueries> {
        let start_time = Instant::now();
        let widget = self.widget(keyword, geo, timeframe, "RELATED_QUERIES").await?;
        let data: RelatedResponse = self
            .get_json("widgetdata/relatedsearches", &widget.request.to_string(), Some(&widget.token))
            .await?;

        let mut lists = data.default.ranked_list.into_iter().map(|list| {
            list.ranked_keyword
                .into_iter()
                .map(|k| QueryValue::new(k.query, k.value))
                .collect::<Vec<_>>()
        });

        let related = RelatedQueries {
            top: lists.next().unwrap_or_default(),
            rising: lists.next().unwrap_or_default(),
            message: None,
        };

        tracing::debug!(
            keyword = %keyword,
            top = related.top.len(),
            rising = related.rising.len(),
            duration_ms = %start_time.elapsed().as_millis(),
            "Fetched related queries"
        );

        Ok(related)
    }
}

/// Strip the anti-XSSI prefix (`)]}'`) and parse the JSON body
fn parse_guarded_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    let start = body
        .find('{')
        .ok_or_else(|| SeoForgeError::parse("Google Trends response has no JSON body", Some(body.chars().take(200).collect())))?;
    serde_json::from_str(&body[start..]).map_err(|e| SeoForgeError::parse(e.to_string(), None))
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    request: Value,
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: Timeline,
}

#[derive(Debug, Deserialize)]
struct Timeline {
    #[serde(rename = "timelineData", default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct TimelinePoint {
    #[serde(default)]
    value: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct RelatedResponse {
    default: RankedLists,
}

#[derive(Debug, Deserialize)]
struct RankedLists {
    #[serde(rename = "rankedList", default)]
    ranked_list: Vec<RankedList>,
}

#[derive(Debug, Deserialize)]
struct RankedList {
    #[serde(rename = "rankedKeyword", default)]
    ranked_keyword: Vec<RankedKeyword>,
}

#[derive(Debug, Deserialize)]
struct RankedKeyword {
    query: String,
    value: u32,
}
