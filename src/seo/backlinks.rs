//! Simulated backlink figures and availability
//!
//! Two modes: `analyze` for the short SEO list, `threshold_search` for the
//! wider backlink scan. Both draw from the caller's generator.

use crate::domain::validator::{normalize_keyword, split_domain};
use crate::types::BacklinkProfile;
use rand::Rng;

/// Quality tier for an analysis-mode backlink count
pub fn backlink_quality(backlinks: u64) -> u32 {
    match backlinks {
        b if b > 1000 => 30,
        b if b > 500 => 25,
        b if b > 100 => 20,
        b if b > 50 => 15,
        _ => 10,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BacklinkEstimator;

impl BacklinkEstimator {
    pub fn new() -> Self {
        Self
    }

    /// `stem_len * 10`, doubled on keyword match, scaled by U(0.5, 2.0)
    pub fn analyze<R: Rng + ?Sized>(&self, domain: &str, keyword: &str, rng: &mut R) -> BacklinkProfile {
        let stem = split_domain(domain).stem;
        let clean = normalize_keyword(keyword);

        let mut base = stem.chars().count() as f64 * 10.0;
        if !clean.is_empty() && stem.contains(&clean) {
            base *= 2.0;
        }

        let backlinks = (base * rng.gen_range(0.5..2.0)) as u64;

        BacklinkProfile {
            backlinks,
            quality_score: backlink_quality(backlinks),
            referring_domains: None,
            domain_authority: None,
        }
    }

    /// U(50, 5000) scaled by keyword, length and extension multipliers,
    /// with derived quality, referring domains and authority
    pub fn threshold_search<R: Rng + ?Sized>(
        &self,
        domain: &str,
        keyword: &str,
        rng: &mut R,
    ) -> BacklinkProfile {
        let domain = domain.to_lowercase();
        let clean = normalize_keyword(keyword);
        let keyword_match = !clean.is_empty() && domain.contains(&clean);
        let length = domain.chars().count();
        let is_com = domain.ends_with(".com");

        let mut backlinks = rng.gen_range(50..=5000) as f64;
        if keyword_match {
            backlinks *= rng.gen_range(1.5..3.0);
        }
        if length <= 8 {
            backlinks *= rng.gen_range(1.2..2.0);
        } else if length >= 15 {
            backlinks *= rng.gen_range(0.5..0.8);
        }
        if is_com {
            backlinks *= rng.gen_range(1.3..2.0);
        } else if domain.ends_with(".com.tr") {
            backlinks *= rng.gen_range(1.1..1.5);
        } else if domain.ends_with(".net") {
            backlinks *= rng.gen_range(1.0..1.3);
        }
        let backlinks = backlinks as u64;

        let mut quality: i64 = rng.gen_range(30..=95);
        if keyword_match {
            quality += 20;
        }
        if length <= 10 {
            quality += 10;
        }
        if is_com {
            quality += 15;
        }
        let quality_score = quality.clamp(10, 100) as u32;

        let referring_domains = (backlinks as f64 * rng.gen_range(0.1..0.3)) as u64;

        let mut authority: i64 = rng.gen_range(15..=85);
        if backlinks > 1000 {
            authority += 15;
        }
        if quality_score > 70 {
            authority += 10;
        }

        BacklinkProfile {
            backlinks,
            quality_score,
            referring_domains: Some(referring_domains),
            domain_authority: Some(authority.clamp(1, 100) as u32),
        }
    }
}

/// Chance that a simulated registry lookup finds the name free
pub fn availability_chance(domain: &str) -> f64 {
    let stem_len = split_domain(domain).stem.chars().count();
    let mut chance = match stem_len {
        0..=6 => 0.1,
        7..=8 => 0.2,
        9..=11 => 0.3,
        _ => 0.5,
    };
    if domain.contains('-') || domain.chars().any(|c| c.is_ascii_digit()) {
        chance += 0.2;
    }
    chance
}

/// Simulated availability draw; longer and hyphen/digit names are freer
pub fn simulate_availability<R: Rng + ?Sized>(domain: &str, rng: &mut R) -> bool {
    rng.gen::<f64>() < availability_chance(domain)
}
