//! Keyword to domain-name lexical match scoring

use crate::domain::validator::{normalize_keyword, split_domain};
use crate::tables::LocaleTables;
use crate::types::Locale;

const EXACT_MATCH: u32 = 80;
const MAX_RELEVANCE: u32 = 100;

/// Scores how well a domain stem matches a keyword, 0..=100
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    premium_words: Vec<String>,
}

impl RelevanceScorer {
    pub fn new(tables: &LocaleTables, locale: &Locale) -> Self {
        Self {
            premium_words: tables.premium_words(locale),
        }
    }

    pub fn score(&self, domain: &str, keyword: &str) -> u32 {
        let stem = split_domain(domain).stem;
        let clean = normalize_keyword(keyword);

        if clean.is_empty() {
            return length_bonus(&stem).saturating_sub(penalty(&stem)).min(MAX_RELEVANCE);
        }

        // exact match is a flat score
        if stem == clean {
            return EXACT_MATCH;
        }

        let mut score = 0u32;

        if let Some(pos) = stem.find(&clean) {
            score += position_bonus(&stem, &clean, pos, (60, 55, 45));
        }

        let words: Vec<String> = keyword
            .split_whitespace()
            .map(normalize_keyword)
            .filter(|w| w.chars().count() > 2)
            .collect();
        if words.len() > 1 {
            for word in &words {
                if let Some(pos) = stem.find(word.as_str()) {
                    score += position_bonus(&stem, word, pos, (25, 20, 15));
                }
            }
        }

        score += length_bonus(&stem);

        if stem.contains(&clean) && self.premium_words.iter().any(|w| stem.contains(w.as_str())) {
            score += 10;
        }

        score.saturating_sub(penalty(&stem)).min(MAX_RELEVANCE)
    }
}

/// Prefix, suffix or interior bonus for a located needle
fn position_bonus(stem: &str, needle: &str, pos: usize, bonuses: (u32, u32, u32)) -> u32 {
    let (prefix, suffix, interior) = bonuses;
    if pos == 0 {
        prefix
    } else if stem.ends_with(needle) {
        suffix
    } else {
        interior
    }
}

fn length_bonus(stem: &str) -> u32 {
    match stem.chars().count() {
        0..=6 => 20,
        7..=8 => 15,
        9..=10 => 10,
        11..=12 => 5,
        _ => 0,
    }
}

fn penalty(stem: &str) -> u32 {
    let mut penalty = 0;
    if stem.chars().any(|c| c.is_ascii_digit()) {
        penalty += 5;
    }
    if stem.contains('-') {
        penalty += 3;
    }
    penalty
}
