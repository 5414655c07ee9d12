//! Candidate domain generation

use crate::domain::validator::normalize_keyword;
use crate::tables::LocaleTables;
use crate::types::Locale;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Upper bound on candidates produced per keyword
pub const MAX_CANDIDATES: usize = 30;

/// Generated name stem plus one allowed extension
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateDomain {
    stem: String,
    extension: String,
}

impl CandidateDomain {
    fn new(stem: &str, extension: &str) -> Self {
        Self {
            stem: stem.to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Full domain name, `stem.extension`
    pub fn name(&self) -> String {
        format!("{}.{}", self.stem, self.extension)
    }
}

impl std::fmt::Display for CandidateDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.stem, self.extension)
    }
}

/// Pre-filter ordering of a stem against the normalized keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchTier {
    Exact,
    Contains,
    Other,
}

impl MatchTier {
    fn of(stem: &str, keyword: &str) -> Self {
        if keyword.is_empty() {
            MatchTier::Other
        } else if stem == keyword {
            MatchTier::Exact
        } else if stem.contains(keyword) {
            MatchTier::Contains
        } else {
            MatchTier::Other
        }
    }
}

/// Builds the bounded candidate list for a keyword and locale
pub struct CandidateGenerator<'a> {
    tables: &'a LocaleTables,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(tables: &'a LocaleTables) -> Self {
        Self { tables }
    }

    /// Candidates ordered by match tier, at most [`MAX_CANDIDATES`]
    pub fn generate(&self, keyword: &str, locale: &Locale) -> Vec<CandidateDomain> {
        let clean = normalize_keyword(keyword);
        let stems = self.stems(&clean, locale);
        let extensions = self.tables.extensions(locale);

        let mut candidates: Vec<CandidateDomain> = stems
            .iter()
            .flat_map(|stem| extensions.iter().map(move |ext| CandidateDomain::new(stem, ext)))
            .collect();

        // stable: generation order survives within a tier
        candidates.sort_by_key(|c| MatchTier::of(c.stem(), &clean));
        candidates.truncate(MAX_CANDIDATES);

        tracing::debug!(
            keyword = %keyword,
            locale = %locale,
            stems = stems.len(),
            candidates = candidates.len(),
            "Generated candidates"
        );

        candidates
    }

    /// Base variations then topic stems, deduplicated, empty stems dropped
    fn stems(&self, clean: &str, locale: &Locale) -> Vec<String> {
        let mut stems = vec![clean.to_string()];
        if let Some(suffix) = self.tables.stem_suffix(locale) {
            stems.push(format!("{}{}", clean, normalize_keyword(suffix)));
        }
        stems.extend(self.tables.stem_variations(clean));
        stems.extend(self.tables.topic_stems(locale, clean));

        let mut seen = HashSet::new();
        stems.retain(|stem| !stem.is_empty() && seen.insert(stem.clone()));
        stems
    }
}
