//! Integration tests for seo-forge
//!
//! Everything runs against stub probes and seeded simulation; nothing here
//! touches the network.

use async_trait::async_trait;
use seo_forge::api::{BacklinkSearchRequest, SeoSearchRequest, TrendRequest};
use seo_forge::domain::{AvailabilityProbe, OfflineProbe};
use seo_forge::seo::quality::{MAX_CHARACTER_SCORE, MAX_LENGTH_SCORE, MAX_PRONOUNCEABLE_SCORE};
use seo_forge::seo::{
    AgeEstimator, CandidateGenerator, QualityScorer, RelevanceScorer, MAX_CANDIDATES, MIN_SEO_SCORE,
};
use seo_forge::trends::{ProviderResult, TrendProvider, TrendQuery};
use seo_forge::trends::providers::LocalSuggestionsProvider;
use seo_forge::{
    AvailabilityReport, AvailabilityStatus, Factor, FallbackChain, Locale, LocaleTables,
    RankingPipeline, Result, SeoForge, Simulation,
};
use std::sync::Arc;
use std::time::Duration;

struct RegisteredEverywhere;

#[async_trait]
impl AvailabilityProbe for RegisteredEverywhere {
    async fn probe(&self, _domain: &str) -> Result<AvailabilityReport> {
        Ok(AvailabilityReport::new(AvailabilityStatus::Registered, "domain resolves"))
    }

    fn name(&self) -> &str {
        "registered_everywhere"
    }
}

struct Down(&'static str);

#[async_trait]
impl TrendProvider for Down {
    async fn fetch(&self, _query: &TrendQuery) -> ProviderResult {
        ProviderResult::failure("service unavailable")
    }

    fn name(&self) -> &str {
        self.0
    }
}

fn forge(seed: u64) -> SeoForge {
    let tables = Arc::new(LocaleTables::default());
    let offline = Arc::new(OfflineProbe::new());
    let pipeline = RankingPipeline::new(Arc::clone(&tables), Arc::new(RegisteredEverywhere), offline.clone())
        .with_simulation(Simulation::seeded(seed))
        .with_probe_delay(Duration::ZERO);
    let trends = FallbackChain::offline(tables, Simulation::seeded(seed));
    SeoForge::new(pipeline, offline, trends)
}

#[test]
fn test_candidate_bounds_and_extensions() {
    let tables = LocaleTables::default();
    let generator = CandidateGenerator::new(&tables);

    for locale in ["TR", "US", "DE"] {
        let locale = Locale::new(locale);
        let allowed = tables.extensions(&locale);
        for keyword in ["altın", "gold price", "bitcoin", "x", "döviz kuru", "!!!"] {
            let candidates = generator.generate(keyword, &locale);
            assert!(
                (1..=MAX_CANDIDATES).contains(&candidates.len()),
                "{} / {}: {} candidates",
                keyword,
                locale,
                candidates.len()
            );
            assert!(candidates
                .iter()
                .all(|c| allowed.iter().any(|ext| ext == c.extension())));
        }
    }
}

#[test]
fn test_relevance_reference_values() {
    let tables = LocaleTables::default();
    let scorer = RelevanceScorer::new(&tables, &Locale::new("US"));

    assert_eq!(scorer.score("bitcoin.com", "bitcoin"), 80);

    let prefixed = scorer.score("bitcoinpro.com", "bitcoin");
    assert!((60..=100).contains(&prefixed));
}

#[test]
fn test_scores_stay_in_range() {
    let tables = LocaleTables::default();
    let locale = Locale::new("TR");
    let relevance = RelevanceScorer::new(&tables, &locale);
    let quality = QualityScorer::new(&tables);

    for keyword in ["altın", "gram altın fiyatı", "a", "bitcoin"] {
        for candidate in CandidateGenerator::new(&tables).generate(keyword, &locale) {
            let domain = candidate.name();
            assert!(relevance.score(&domain, keyword) <= 100);

            let factors = quality.score(&domain);
            assert!(factors.get(Factor::LengthScore).unwrap_or(0) <= MAX_LENGTH_SCORE);
            assert!(factors.get(Factor::CharacterScore).unwrap_or(0) <= MAX_CHARACTER_SCORE);
            assert!(factors.get(Factor::Pronounceable).unwrap_or(0) <= MAX_PRONOUNCEABLE_SCORE);
        }
    }
}

#[tokio::test]
async fn test_simulated_age_is_deterministic() {
    let tables = LocaleTables::default();
    let estimator = AgeEstimator::new(&tables);

    let first = estimator.estimate("altinfiyat.com.tr", &OfflineProbe).await;
    let second = estimator.estimate("altinfiyat.com.tr", &OfflineProbe).await;

    assert!(first.simulated);
    assert_eq!(first.years, second.years);
    assert_eq!(first.score, second.score);
    assert_eq!(first.creation_date, second.creation_date);
}

#[tokio::test]
async fn test_seo_search_never_returns_low_scores() {
    let forge = forge(11);
    for keyword in ["altın", "borsa", "kripto para"] {
        let envelope = forge
            .find_seo_domains(&SeoSearchRequest::new(keyword, Locale::new("TR")).with_limit(30))
            .await;
        assert!(envelope.success);

        let result = envelope.data.unwrap();
        assert_eq!(result.total_found, result.domains.len());
        assert!(result.domains.iter().all(|d| d.seo_score > MIN_SEO_SCORE));
    }
}

#[tokio::test]
async fn test_backlink_search_floor_and_order() {
    for seed in [1, 2, 3] {
        let envelope = forge(seed)
            .find_backlink_domains(
                &BacklinkSearchRequest::new("gold", Locale::new("US"))
                    .with_min_backlinks(500)
                    .with_limit(10),
            )
            .await;
        assert!(envelope.success);

        let result = envelope.data.unwrap();
        assert_eq!(result.min_backlinks, 500);
        assert!(result.domains.len() <= 10);
        assert!(result
            .domains
            .iter()
            .all(|d| d.assessment.backlink_estimate >= 500));
        assert!(result
            .domains
            .windows(2)
            .all(|w| w[0].assessment.backlink_estimate >= w[1].assessment.backlink_estimate));
    }
}

#[tokio::test]
async fn test_fallback_chain_reports_satisfying_provider() {
    let tables = Arc::new(LocaleTables::default());
    let chain = FallbackChain::new(LocalSuggestionsProvider::new(Arc::clone(&tables)))
        .with_provider(Box::new(Down("primary")))
        .with_provider(Box::new(Down("secondary")))
        .with_provider(Box::new(LocalSuggestionsProvider::new(Arc::clone(&tables))));

    let report = chain.fetch("gold", &Locale::new("US")).await;
    assert_eq!(report.api_used, "local_suggestions");
    assert_eq!(report.failures.len(), 2);

    let all_down = FallbackChain::new(LocalSuggestionsProvider::new(tables))
        .with_provider(Box::new(Down("primary")))
        .with_provider(Box::new(Down("secondary")))
        .with_provider(Box::new(Down("tertiary")));
    let report = all_down.fetch("gold", &Locale::new("US")).await;
    assert_eq!(report.failures.len(), 3);
    assert!(!report.suggestions.is_empty());
}

#[tokio::test]
async fn test_trend_envelope() {
    let envelope = forge(5)
        .fetch_keyword_trends(&TrendRequest {
            keyword: "altın".to_string(),
            locale: Locale::new("TR"),
        })
        .await;
    assert!(envelope.success);

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["api_used"], "related_estimates");
    assert!(json["debug_info"].is_string());
}

#[tokio::test]
async fn test_altin_end_to_end() {
    let tables = LocaleTables::default();
    let locale = Locale::new("TR");

    let candidates = CandidateGenerator::new(&tables).generate("altın", &locale);
    for extension in tables.extensions(&locale) {
        assert!(candidates
            .iter()
            .any(|c| c.stem() == "altin" && c.extension() == extension));
    }

    let relevance = RelevanceScorer::new(&tables, &locale);
    assert_eq!(relevance.score("altin.com.tr", "altın"), 80);

    let result = forge(9)
        .find_seo_domains(&SeoSearchRequest::new("altın", locale))
        .await
        .data
        .unwrap();
    let exact = result
        .domains
        .iter()
        .find(|d| d.domain == "altin.com")
        .expect("exact match should rank");
    assert_eq!(exact.keyword_relevance, 80);
    assert_eq!(exact.status, AvailabilityStatus::Registered);
}
