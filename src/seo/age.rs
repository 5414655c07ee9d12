//! Domain age: WHOIS creation date when available, hash-keyed simulation otherwise

use crate::domain::validator::split_domain;
use crate::domain::WhoisProbe;
use crate::seo::simulation::md5_prefix;
use crate::tables::LocaleTables;
use crate::types::DomainAge;
use chrono::{DateTime, Duration, Utc};

const DAYS_PER_YEAR: f64 = 365.25;
const SIMULATED_NOTE: &str = "estimated age (WHOIS data unavailable)";

/// Score for an age in years
pub fn age_score(years: f64) -> u32 {
    if years > 15.0 {
        30
    } else if years > 10.0 {
        25
    } else if years > 5.0 {
        20
    } else if years > 2.0 {
        15
    } else if years > 1.0 {
        10
    } else {
        5
    }
}

pub struct AgeEstimator<'a> {
    tables: &'a LocaleTables,
}

impl<'a> AgeEstimator<'a> {
    pub fn new(tables: &'a LocaleTables) -> Self {
        Self { tables }
    }

    /// Real creation date from WHOIS, falling back to simulation
    pub async fn estimate(&self, domain: &str, whois: &dyn WhoisProbe) -> DomainAge {
        match whois.whois(domain).await {
            Ok(record) => match record.creation_date {
                Some(created) => return Self::from_creation_date(created, Utc::now()),
                None => {
                    tracing::debug!(domain = %domain, "WHOIS returned no creation date");
                }
            },
            Err(e) => {
                tracing::debug!(domain = %domain, error = %e, "WHOIS unavailable for age");
            }
        }

        self.simulate(domain)
    }

    /// Age from a known registration date
    pub fn from_creation_date(created: DateTime<Utc>, now: DateTime<Utc>) -> DomainAge {
        let years = ((now - created).num_days() as f64 / DAYS_PER_YEAR).max(0.0);

        DomainAge {
            years,
            label: format!("{:.1} years", years),
            score: age_score(years),
            creation_date: created.format("%Y-%m-%d").to_string(),
            simulated: false,
            note: None,
        }
    }

    /// Deterministic per domain string
    pub fn simulate(&self, domain: &str) -> DomainAge {
        self.simulate_at(domain, Utc::now())
    }

    pub fn simulate_at(&self, domain: &str, now: DateTime<Utc>) -> DomainAge {
        let domain = domain.trim().to_lowercase();
        let years = self.simulated_years(&domain);
        // out-of-range ages from hand-built tables keep today's date
        let created = Duration::try_seconds((years * DAYS_PER_YEAR * 86_400.0) as i64)
            .and_then(|age| now.checked_sub_signed(age))
            .unwrap_or(now);

        DomainAge {
            years,
            label: format!("~{:.1} years", years),
            score: age_score(years),
            creation_date: created.format("%Y-%m-%d").to_string(),
            simulated: true,
            note: Some(SIMULATED_NOTE.to_string()),
        }
    }

    /// Hash picks a tenth-of-a-year step inside the widened extension range
    fn simulated_years(&self, domain: &str) -> f64 {
        let parts = split_domain(domain);
        let range = self.tables.age_range(&parts.extension);
        let (mut min, mut max) = (range.min, range.max);

        match parts.stem.chars().count() {
            0..=4 => {
                min = min.saturating_add(3);
                max = max.saturating_add(5);
            }
            5..=6 => {
                min = min.saturating_add(1);
                max = max.saturating_add(2);
            }
            _ => {}
        }

        if self
            .tables
            .legacy_words()
            .iter()
            .any(|word| parts.stem.contains(word.as_str()))
        {
            min = min.saturating_add(2);
            max = max.saturating_add(3);
        }

        let steps = u64::from(max.saturating_sub(min)) * 10;
        if steps == 0 {
            return f64::from(min);
        }
        f64::from(min) + (md5_prefix(domain) % steps) as f64 / 10.0
    }
}
