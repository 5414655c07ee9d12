//! Aggregate score and monetary estimate

use crate::types::ScoreFactors;

pub const MAX_SEO_SCORE: u32 = 100;
const BACKLINK_VALUE_CAP: f64 = 1000.0;

/// Sum of all factor entries, clamped to 0..=100
pub fn seo_score(factors: &ScoreFactors) -> u32 {
    factors.total().min(MAX_SEO_SCORE)
}

/// `seo*10 + min(backlinks*0.5, 1000) + relevance*5`
pub fn raw_value(seo_score: u32, backlinks: u64, keyword_relevance: u32) -> f64 {
    f64::from(seo_score) * 10.0
        + (backlinks as f64 * 0.5).min(BACKLINK_VALUE_CAP)
        + f64::from(keyword_relevance) * 5.0
}

/// "$X,XXX+" above 5000, "$X,XXX" above 1000, plain "$X" otherwise
pub fn format_value(value: f64) -> String {
    let rounded = value.max(0.0).round() as u64;
    if value > 5000.0 {
        format!("${}+", with_thousands(rounded))
    } else if value > 1000.0 {
        format!("${}", with_thousands(rounded))
    } else {
        format!("${}", rounded)
    }
}

pub fn estimated_value(seo_score: u32, backlinks: u64, keyword_relevance: u32) -> String {
    format_value(raw_value(seo_score, backlinks, keyword_relevance))
}

fn with_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Factor;

    #[test]
    fn test_seo_score_clamped() {
        let mut factors = ScoreFactors::new();
        factors.set(Factor::KeywordMatch, 80);
        factors.set(Factor::ExtensionScore, 30);
        assert_eq!(seo_score(&factors), 100);

        let mut factors = ScoreFactors::new();
        factors.set(Factor::LengthScore, 25);
        assert_eq!(seo_score(&factors), 25);
        assert_eq!(seo_score(&ScoreFactors::new()), 0);
    }

    #[test]
    fn test_raw_value_caps_backlinks() {
        assert_eq!(raw_value(100, 10_000, 80), 1000.0 + 1000.0 + 400.0);
        assert_eq!(raw_value(50, 100, 20), 500.0 + 50.0 + 100.0);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(650.0), "$650");
        assert_eq!(format_value(1000.0), "$1000");
        assert_eq!(format_value(2400.0), "$2,400");
        assert_eq!(format_value(5000.0), "$5,000");
        assert_eq!(format_value(5200.4), "$5,200+");
        assert_eq!(format_value(1_234_567.0), "$1,234,567+");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(with_thousands(0), "0");
        assert_eq!(with_thousands(999), "999");
        assert_eq!(with_thousands(1000), "1,000");
        assert_eq!(with_thousands(100_000), "100,000");
    }
}
