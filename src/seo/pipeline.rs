//! SEO value search and backlink threshold search

use crate::domain::{AvailabilityProbe, WhoisProbe};
use crate::error::Result;
use crate::seo::age::AgeEstimator;
use crate::seo::backlinks::{backlink_quality, simulate_availability, BacklinkEstimator};
use crate::seo::candidates::{CandidateDomain, CandidateGenerator};
use crate::seo::quality::QualityScorer;
use crate::seo::relevance::RelevanceScorer;
use crate::seo::simulation::Simulation;
use crate::seo::value;
use crate::tables::LocaleTables;
use crate::types::{
    AvailabilityStatus, BacklinkDomain, BacklinkProfile, DomainAge, DomainAssessment, Factor,
    Locale,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Assessments at or below this score are dropped from SEO search
pub const MIN_SEO_SCORE: u32 = 30;

/// Scorers bound to one keyword and locale
struct RunContext<'a> {
    keyword: &'a str,
    relevance: RelevanceScorer,
    quality: QualityScorer<'a>,
    age: AgeEstimator<'a>,
}

/// Orchestrates generation, probing, scoring and ranking
pub struct RankingPipeline {
    tables: Arc<LocaleTables>,
    availability: Arc<dyn AvailabilityProbe>,
    whois: Arc<dyn WhoisProbe>,
    simulation: Simulation,
    backlinks: BacklinkEstimator,
    probe_delay: Duration,
}

impl RankingPipeline {
    pub fn new(
        tables: Arc<LocaleTables>,
        availability: Arc<dyn AvailabilityProbe>,
        whois: Arc<dyn WhoisProbe>,
    ) -> Self {
        Self {
            tables,
            availability,
            whois,
            simulation: Simulation::from_entropy(),
            backlinks: BacklinkEstimator::new(),
            probe_delay: Duration::from_millis(500),
        }
    }

    pub fn with_simulation(mut self, simulation: Simulation) -> Self {
        self.simulation = simulation;
        self
    }

    /// Pause between successive probe calls; zero disables it
    pub fn with_probe_delay(mut self, delay: Duration) -> Self {
        self.probe_delay = delay;
        self
    }

    pub fn simulation(&self) -> Simulation {
        self.simulation
    }

    /// Score up to `limit` candidates, keep those above [`MIN_SEO_SCORE`],
    /// best first
    pub async fn seo_search(
        &self,
        keyword: &str,
        locale: &Locale,
        limit: usize,
    ) -> Result<Vec<DomainAssessment>> {
        validate_request(keyword, limit)?;
        let start_time = Instant::now();
        let ctx = self.context(keyword, locale);

        let candidates = CandidateGenerator::new(&self.tables).generate(keyword, locale);
        let mut assessments = Vec::new();

        for (i, candidate) in candidates.iter().take(limit).enumerate() {
            if i > 0 {
                self.pause().await;
            }

            match self.assess(&ctx, candidate).await {
                Ok(assessment) if assessment.seo_score > MIN_SEO_SCORE => assessments.push(assessment),
                Ok(assessment) => {
                    tracing::debug!(
                        domain = %assessment.domain,
                        seo_score = assessment.seo_score,
                        "Below minimum SEO score"
                    );
                }
                Err(e) => {
                    tracing::warn!(domain = %candidate, error = %e, "Skipping candidate");
                }
            }
        }

        // stable: ties keep generation order
        assessments.sort_by(|a, b| b.seo_score.cmp(&a.seo_score));
        assessments.truncate(limit);

        tracing::info!(
            keyword = %keyword,
            locale = %locale,
            found = assessments.len(),
            duration_ms = %start_time.elapsed().as_millis(),
            "SEO search completed"
        );

        Ok(assessments)
    }

    /// Scan up to `2 * limit` candidates for simulated-available names with at
    /// least `min_backlinks`, most backlinks first
    pub async fn backlink_search(
        &self,
        keyword: &str,
        locale: &Locale,
        min_backlinks: u64,
        limit: usize,
    ) -> Result<Vec<BacklinkDomain>> {
        validate_request(keyword, limit)?;
        let start_time = Instant::now();
        let ctx = self.context(keyword, locale);

        let candidates = CandidateGenerator::new(&self.tables).generate(keyword, locale);
        let mut results = Vec::new();
        let mut probed = 0usize;

        for candidate in candidates.iter().take(limit.saturating_mul(2)) {
            let domain = candidate.name();
            let mut rng = self.simulation.rng_for(&domain, keyword);

            if !simulate_availability(&domain, &mut rng) {
                tracing::debug!(domain = %domain, "Simulated as taken");
                continue;
            }

            let profile = self.backlinks.threshold_search(&domain, keyword, &mut rng);
            if profile.backlinks < min_backlinks {
                tracing::debug!(domain = %domain, backlinks = profile.backlinks, "Below backlink floor");
                continue;
            }

            if probed > 0 {
                self.pause().await;
            }
            probed += 1;

            let age = ctx.age.estimate(&domain, self.whois.as_ref()).await;
            results.push(self.backlink_row(&ctx, candidate, profile, age));
        }

        results.sort_by(|a, b| b.assessment.backlink_estimate.cmp(&a.assessment.backlink_estimate));
        results.truncate(limit);

        tracing::info!(
            keyword = %keyword,
            locale = %locale,
            min_backlinks,
            found = results.len(),
            duration_ms = %start_time.elapsed().as_millis(),
            "Backlink search completed"
        );

        Ok(results)
    }

    fn context<'a>(&'a self, keyword: &'a str, locale: &Locale) -> RunContext<'a> {
        RunContext {
            keyword,
            relevance: RelevanceScorer::new(&self.tables, locale),
            quality: QualityScorer::new(&self.tables),
            age: AgeEstimator::new(&self.tables),
        }
    }

    /// Full factor pass with analysis-mode backlinks
    async fn assess(&self, ctx: &RunContext<'_>, candidate: &CandidateDomain) -> Result<DomainAssessment> {
        let domain = candidate.name();
        let report = self.availability.probe(&domain).await?;

        let mut rng = self.simulation.rng_for(&domain, ctx.keyword);
        let profile = self.backlinks.analyze(&domain, ctx.keyword, &mut rng);

        let age = if report.status == AvailabilityStatus::Registered {
            ctx.age.estimate(&domain, self.whois.as_ref()).await
        } else {
            ctx.age.simulate(&domain)
        };

        Ok(build_assessment(ctx, domain, report.status, report.note, profile, age))
    }

    fn backlink_row(
        &self,
        ctx: &RunContext<'_>,
        candidate: &CandidateDomain,
        profile: BacklinkProfile,
        age: DomainAge,
    ) -> BacklinkDomain {
        // the factor set uses the analysis tiers on the threshold count
        let analysis_profile = BacklinkProfile {
            quality_score: backlink_quality(profile.backlinks),
            ..profile
        };
        let assessment = build_assessment(
            ctx,
            candidate.name(),
            AvailabilityStatus::Available,
            "simulated availability".to_string(),
            analysis_profile,
            age,
        );

        BacklinkDomain {
            assessment,
            available: true,
            quality_score: profile.quality_score,
            referring_domains: profile.referring_domains.unwrap_or_default(),
            domain_authority: profile.domain_authority.unwrap_or_default(),
        }
    }

    async fn pause(&self) {
        if !self.probe_delay.is_zero() {
            tokio::time::sleep(self.probe_delay).await;
        }
    }
}

fn validate_request(keyword: &str, limit: usize) -> Result<()> {
    if keyword.trim().is_empty() {
        return Err(crate::validation_error!("Keyword cannot be empty"));
    }
    if limit == 0 {
        return Err(crate::validation_error!("Limit must be at least 1"));
    }
    Ok(())
}

fn build_assessment(
    ctx: &RunContext<'_>,
    domain: String,
    status: AvailabilityStatus,
    availability_note: String,
    profile: BacklinkProfile,
    age: DomainAge,
) -> DomainAssessment {
    let keyword_relevance = ctx.relevance.score(&domain, ctx.keyword);

    let mut factors = ctx.quality.score(&domain);
    factors.set(Factor::KeywordMatch, keyword_relevance);
    factors.set(Factor::BacklinkQuality, profile.quality_score);
    factors.set(Factor::DomainAge, age.score);

    let seo_score = value::seo_score(&factors);
    let estimated_value = value::estimated_value(seo_score, profile.backlinks, keyword_relevance);

    DomainAssessment {
        domain,
        status,
        availability_note,
        factors,
        seo_score,
        keyword_relevance,
        backlink_estimate: profile.backlinks,
        domain_age: age,
        estimated_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeoForgeError;
    use crate::domain::OfflineProbe;
    use crate::types::AvailabilityReport;
    use async_trait::async_trait;

    /// Times out for every name containing "market"
    struct FlakyProbe;

    #[async_trait]
    impl AvailabilityProbe for FlakyProbe {
        async fn probe(&self, domain: &str) -> Result<AvailabilityReport> {
            if domain.contains("market") {
                Err(SeoForgeError::timeout("DNS lookup", 1))
            } else {
                Ok(AvailabilityReport::new(AvailabilityStatus::Registered, "stub"))
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn pipeline(availability: Arc<dyn AvailabilityProbe>) -> RankingPipeline {
        RankingPipeline::new(Arc::new(LocaleTables::default()), availability, Arc::new(OfflineProbe))
            .with_simulation(Simulation::seeded(42))
            .with_probe_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_seo_search_filters_and_sorts() {
        let results = pipeline(Arc::new(OfflineProbe))
            .seo_search("altın", &Locale::new("TR"), 10)
            .await
            .unwrap();

        assert!(!results.is_empty());
        assert!(results.len() <= 10);
        assert!(results.iter().all(|a| a.seo_score > MIN_SEO_SCORE && a.seo_score <= 100));
        assert!(results.windows(2).all(|w| w[0].seo_score >= w[1].seo_score));
    }

    #[tokio::test]
    async fn test_probe_failure_skips_candidate() {
        let results = pipeline(Arc::new(FlakyProbe))
            .seo_search("altın", &Locale::new("TR"), 30)
            .await
            .unwrap();

        assert!(!results.is_empty());
        assert!(results.iter().all(|a| !a.domain.contains("market")));
        assert!(results.iter().all(|a| a.status == AvailabilityStatus::Registered));
    }

    #[tokio::test]
    async fn test_tied_scores_keep_generation_order() {
        let tables = LocaleTables::default();
        let locale = Locale::new("TR");
        let generated: Vec<String> = CandidateGenerator::new(&tables)
            .generate("altın", &locale)
            .iter()
            .map(|c| c.name())
            .collect();
        let position = |domain: &str| generated.iter().position(|g| g == domain).unwrap();

        let results = pipeline(Arc::new(OfflineProbe))
            .seo_search("altın", &locale, 10)
            .await
            .unwrap();

        let top: Vec<&str> = results.iter().take(4).map(|a| a.domain.as_str()).collect();
        assert_eq!(top, ["altin.com", "altin.com.tr", "altin.net", "altin.net.tr"]);
        assert!(results.iter().take(4).all(|a| a.seo_score == 100));

        for pair in results.windows(2) {
            if pair[0].seo_score == pair[1].seo_score {
                assert!(position(&pair[0].domain) < position(&pair[1].domain));
            }
        }
    }

    #[tokio::test]
    async fn test_seeded_runs_match() {
        let locale = Locale::new("US");
        let a = pipeline(Arc::new(OfflineProbe)).backlink_search("gold", &locale, 100, 10).await.unwrap();
        let b = pipeline(Arc::new(OfflineProbe)).backlink_search("gold", &locale, 100, 10).await.unwrap();

        let rows = |r: &[BacklinkDomain]| {
            r.iter()
                .map(|d| (d.assessment.domain.clone(), d.assessment.backlink_estimate, d.domain_authority))
                .collect::<Vec<_>>()
        };
        assert_eq!(rows(a.as_slice()), rows(b.as_slice()));
    }

    #[tokio::test]
    async fn test_backlink_search_floor_and_order() {
        let results = pipeline(Arc::new(OfflineProbe))
            .backlink_search("gold", &Locale::new("US"), 500, 10)
            .await
            .unwrap();

        assert!(results.len() <= 10);
        for row in &results {
            assert!(row.assessment.backlink_estimate >= 500);
            assert!(row.available);
            assert_eq!(row.assessment.status, AvailabilityStatus::Available);
            assert!((1..=100).contains(&row.domain_authority));
        }
        assert!(results
            .windows(2)
            .all(|w| w[0].assessment.backlink_estimate >= w[1].assessment.backlink_estimate));
    }

    #[tokio::test]
    async fn test_rejects_empty_keyword_and_zero_limit() {
        let pipeline = pipeline(Arc::new(OfflineProbe));
        let locale = Locale::default();
        assert!(matches!(
            pipeline.seo_search("  ", &locale, 10).await,
            Err(SeoForgeError::Validation { .. })
        ));
        assert!(matches!(
            pipeline.backlink_search("altın", &locale, 100, 0).await,
            Err(SeoForgeError::Validation { .. })
        ));
    }
}
