//! Keyword-independent lexical quality of a domain

use crate::domain::validator::split_domain;
use crate::tables::LocaleTables;
use crate::types::{Factor, ScoreFactors};

pub const MAX_LENGTH_SCORE: u32 = 25;
pub const MAX_CHARACTER_SCORE: u32 = 20;
pub const MAX_PRONOUNCEABLE_SCORE: u32 = 15;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Extension, length, character mix and pronounceability factors
pub struct QualityScorer<'a> {
    tables: &'a LocaleTables,
}

impl<'a> QualityScorer<'a> {
    pub fn new(tables: &'a LocaleTables) -> Self {
        Self { tables }
    }

    pub fn score(&self, domain: &str) -> ScoreFactors {
        let parts = split_domain(domain);

        let mut factors = ScoreFactors::new();
        factors.set(Factor::ExtensionScore, self.tables.extension_score(&parts.extension));
        factors.set(Factor::LengthScore, length_score(&parts.stem));
        factors.set(Factor::CharacterScore, character_score(&parts.stem));
        factors.set(Factor::Pronounceable, pronounceable_score(&parts.stem));
        factors
    }
}

fn length_score(stem: &str) -> u32 {
    match stem.chars().count() {
        0..=6 => MAX_LENGTH_SCORE,
        7..=10 => 20,
        11..=15 => 15,
        _ => 5,
    }
}

fn character_score(stem: &str) -> u32 {
    let mut score = MAX_CHARACTER_SCORE;
    if stem.contains('-') {
        score = score.saturating_sub(5);
    }
    if stem.chars().any(|c| c.is_ascii_digit()) {
        score = score.saturating_sub(3);
    }
    score
}

/// Vowel share of the letters in [0.2, 0.6] reads well
fn pronounceable_score(stem: &str) -> u32 {
    let letters: Vec<char> = stem
        .chars()
        .filter(|c| c.is_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let vowels = letters.iter().filter(|c| VOWELS.contains(*c)).count();
    let consonants = letters.len() - vowels;

    if vowels == 0 || consonants == 0 {
        return 0;
    }

    let ratio = vowels as f64 / letters.len() as f64;
    if (0.2..=0.6).contains(&ratio) {
        MAX_PRONOUNCEABLE_SCORE
    } else {
        5
    }
}
