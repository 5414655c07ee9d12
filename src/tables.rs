//! Locale and keyword lookup tables.
//!
//! Every table the pipeline consults lives here so it can be replaced from a
//! TOML file. Per-locale maps fall back to their `default` entry, which must
//! always be present.

use crate::domain::validator::normalize_keyword;
use crate::error::Result;
use crate::types::Locale;
use crate::config_error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Key of the mandatory fallback entry in every per-locale table
pub const DEFAULT_KEY: &str = "default";

/// Placeholder replaced by the caller's keyword in suggestion templates
pub const KEYWORD_PLACEHOLDER: &str = "{keyword}";

/// Placeholder replaced by the normalized keyword in stem patterns
pub const STEM_PLACEHOLDER: &str = "{stem}";

/// Upper bound for any configured extension age range, in years
pub const MAX_AGE_YEARS: u32 = 100;

/// Curated stems appended when a keyword falls into a high-value topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicBucket {
    pub triggers: Vec<String>,
    pub stems: Vec<String>,
}

/// Keyword variants the trend provider tries for a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendVariants {
    pub trigger: String,
    pub variants: Vec<String>,
}

/// One canned related query; `value` absent means "draw a popularity figure"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CannedQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

/// Suggestion list selected when `trigger` occurs in the keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub trigger: String,
    pub queries: Vec<CannedQuery>,
}

/// Inclusive plausible age range in years for an extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// All lookup data used by candidate generation, scoring and trend fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleTables {
    /// Allowed extensions per locale, without the leading dot
    pub extensions: HashMap<String, Vec<String>>,
    /// Locale suffix appended to the stem ("altin" -> "altintr")
    pub stem_suffixes: HashMap<String, String>,
    /// Generic stem variations, `{stem}` replaced by the normalized keyword
    pub stem_patterns: Vec<String>,
    pub topic_buckets: HashMap<String, Vec<TopicBucket>>,
    /// Combinator words that earn a relevance bonus next to the keyword
    pub premium_words: Vec<String>,
    /// Words that make a simulated domain look older
    pub legacy_words: Vec<String>,
    pub extension_scores: HashMap<String, u32>,
    pub unknown_extension_score: u32,
    pub extension_age_ranges: HashMap<String, AgeRange>,
    pub trend_variants: HashMap<String, Vec<TrendVariants>>,
    pub related_queries: HashMap<String, Vec<SuggestionSet>>,
    pub rising_queries: HashMap<String, Vec<SuggestionSet>>,
    pub local_suggestions: HashMap<String, Vec<SuggestionSet>>,
}

impl LocaleTables {
    /// Parse tables from TOML; sections left out keep their built-in values
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut tables: LocaleTables = toml::from_str(content)?;
        tables.normalize_locale_keys();
        tables.validate()?;
        Ok(tables)
    }

    /// Per-locale keys as [`Locale`] stores them; `default` stays lower-case
    fn normalize_locale_keys(&mut self) {
        normalize_keys(&mut self.extensions);
        normalize_keys(&mut self.stem_suffixes);
        normalize_keys(&mut self.topic_buckets);
        normalize_keys(&mut self.trend_variants);
        normalize_keys(&mut self.related_queries);
        normalize_keys(&mut self.rising_queries);
        normalize_keys(&mut self.local_suggestions);
    }

    /// Load tables from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::SeoForgeError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Every per-locale table needs a `default` entry
    pub fn validate(&self) -> Result<()> {
        if self.extensions.get(DEFAULT_KEY).map_or(true, Vec::is_empty) {
            return Err(config_error!("extensions table needs a non-empty '{}' entry", DEFAULT_KEY));
        }
        if let Some((locale, _)) = self.extensions.iter().find(|(_, exts)| exts.is_empty()) {
            return Err(config_error!("extensions for '{}' cannot be empty", locale));
        }
        if !self.extension_age_ranges.contains_key(DEFAULT_KEY) {
            return Err(config_error!("extension_age_ranges needs a '{}' entry", DEFAULT_KEY));
        }
        if let Some((ext, range)) = self.extension_age_ranges.iter().find(|(_, r)| r.max < r.min) {
            return Err(config_error!(
                "age range for '{}' is inverted ({} > {})",
                ext,
                range.min,
                range.max
            ));
        }
        if let Some((ext, range)) = self
            .extension_age_ranges
            .iter()
            .find(|(_, r)| r.max > MAX_AGE_YEARS)
        {
            return Err(config_error!(
                "age range for '{}' exceeds {} years (max {})",
                ext,
                MAX_AGE_YEARS,
                range.max
            ));
        }

        for (name, table) in [
            ("related_queries", &self.related_queries),
            ("rising_queries", &self.rising_queries),
            ("local_suggestions", &self.local_suggestions),
        ] {
            let default_locale = table
                .get(DEFAULT_KEY)
                .ok_or_else(|| config_error!("{} needs a '{}' locale", name, DEFAULT_KEY))?;
            if !default_locale.iter().any(|set| set.trigger == DEFAULT_KEY) {
                return Err(config_error!(
                    "{}.{} needs a set with trigger '{}'",
                    name,
                    DEFAULT_KEY,
                    DEFAULT_KEY
                ));
            }
        }

        Ok(())
    }

    /// Extensions allowed for a locale
    pub fn extensions(&self, locale: &Locale) -> &[String] {
        for_locale(&self.extensions, locale)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Stem variations for a normalized keyword, in table order
    pub fn stem_variations(&self, stem: &str) -> Vec<String> {
        self.stem_patterns
            .iter()
            .map(|pattern| pattern.replace(STEM_PLACEHOLDER, stem))
            .collect()
    }

    pub fn stem_suffix(&self, locale: &Locale) -> Option<&str> {
        for_locale(&self.stem_suffixes, locale)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Curated stems of the first bucket whose trigger occurs in the keyword
    pub fn topic_stems(&self, locale: &Locale, normalized_keyword: &str) -> Vec<String> {
        let Some(buckets) = self.topic_buckets.get(locale.code()) else {
            return Vec::new();
        };

        buckets
            .iter()
            .find(|bucket| {
                bucket
                    .triggers
                    .iter()
                    .any(|t| contains_normalized(normalized_keyword, t))
            })
            .map(|bucket| bucket.stems.iter().map(|s| normalize_keyword(s)).collect())
            .unwrap_or_default()
    }

    /// Premium combinator words plus the locale suffix, normalized
    pub fn premium_words(&self, locale: &Locale) -> Vec<String> {
        let mut words: Vec<String> = self.premium_words.iter().map(|w| normalize_keyword(w)).collect();
        if let Some(suffix) = self.stem_suffix(locale) {
            words.push(normalize_keyword(suffix));
        }
        words.retain(|w| !w.is_empty());
        words
    }

    pub fn legacy_words(&self) -> Vec<String> {
        self.legacy_words
            .iter()
            .map(|w| normalize_keyword(w))
            .filter(|w| !w.is_empty())
            .collect()
    }

    pub fn extension_score(&self, extension: &str) -> u32 {
        self.extension_scores
            .get(extension)
            .copied()
            .unwrap_or(self.unknown_extension_score)
    }

    pub fn age_range(&self, extension: &str) -> AgeRange {
        self.extension_age_ranges
            .get(extension)
            .or_else(|| self.extension_age_ranges.get(DEFAULT_KEY))
            .copied()
            .unwrap_or(AgeRange::new(1, 10))
    }

    /// Keyword variants for trend queries; the raw keyword when no topic matches
    pub fn trend_variants(&self, locale: &Locale, keyword: &str) -> Vec<String> {
        let normalized = normalize_keyword(keyword);
        self.trend_variants
            .get(locale.code())
            .and_then(|sets| {
                sets.iter()
                    .find(|set| contains_normalized(&normalized, &set.trigger))
            })
            .map(|set| set.variants.clone())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| vec![keyword.to_string()])
    }

    pub fn related_queries(&self, locale: &Locale, keyword: &str) -> Option<Vec<CannedQuery>> {
        select_suggestions(&self.related_queries, locale, keyword)
    }

    pub fn rising_queries(&self, locale: &Locale, keyword: &str) -> Option<Vec<CannedQuery>> {
        select_suggestions(&self.rising_queries, locale, keyword)
    }

    pub fn local_suggestions(&self, locale: &Locale, keyword: &str) -> Option<Vec<CannedQuery>> {
        select_suggestions(&self.local_suggestions, locale, keyword)
    }
}

fn normalize_keys<T>(map: &mut HashMap<String, T>) {
    *map = std::mem::take(map)
        .into_iter()
        .map(|(key, value)| {
            if key.trim().eq_ignore_ascii_case(DEFAULT_KEY) {
                (DEFAULT_KEY.to_string(), value)
            } else {
                (Locale::new(&key).code().to_string(), value)
            }
        })
        .collect();
}

fn for_locale<'a, T>(map: &'a HashMap<String, T>, locale: &Locale) -> Option<&'a T> {
    map.get(locale.code()).or_else(|| map.get(DEFAULT_KEY))
}

fn contains_normalized(normalized_keyword: &str, trigger: &str) -> bool {
    let trigger = normalize_keyword(trigger);
    !trigger.is_empty() && normalized_keyword.contains(&trigger)
}

/// Locale table (or the `default` locale), first matching trigger, else its
/// `default` set; `{keyword}` expanded.
fn select_suggestions(
    table: &HashMap<String, Vec<SuggestionSet>>,
    locale: &Locale,
    keyword: &str,
) -> Option<Vec<CannedQuery>> {
    let sets = for_locale(table, locale)?;
    let normalized = normalize_keyword(keyword);

    let chosen = sets
        .iter()
        .filter(|set| set.trigger != DEFAULT_KEY)
        .find(|set| contains_normalized(&normalized, &set.trigger))
        .or_else(|| sets.iter().find(|set| set.trigger == DEFAULT_KEY))?;

    Some(
        chosen
            .queries
            .iter()
            .map(|q| CannedQuery {
                query: q.query.replace(KEYWORD_PLACEHOLDER, keyword),
                value: q.value,
            })
            .collect(),
    )
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn bucket(triggers: &[&str], stems: &[&str]) -> TopicBucket {
    TopicBucket {
        triggers: strings(triggers),
        stems: strings(stems),
    }
}

fn fixed(trigger: &str, queries: &[(&str, u32)]) -> SuggestionSet {
    SuggestionSet {
        trigger: trigger.to_string(),
        queries: queries
            .iter()
            .map(|(q, v)| CannedQuery {
                query: q.to_string(),
                value: Some(*v),
            })
            .collect(),
    }
}

fn drawn(trigger: &str, queries: &[&str]) -> SuggestionSet {
    SuggestionSet {
        trigger: trigger.to_string(),
        queries: queries
            .iter()
            .map(|q| CannedQuery {
                query: q.to_string(),
                value: None,
            })
            .collect(),
    }
}

impl Default for LocaleTables {
    fn default() -> Self {
        let mut extensions = HashMap::new();
        extensions.insert("TR".to_string(), strings(&["com", "com.tr", "net", "net.tr"]));
        extensions.insert(DEFAULT_KEY.to_string(), strings(&["com", "net", "org"]));

        let mut stem_suffixes = HashMap::new();
        stem_suffixes.insert("TR".to_string(), "tr".to_string());

        let mut topic_buckets = HashMap::new();
        topic_buckets.insert(
            "TR".to_string(),
            vec![
                bucket(
                    &["altın", "gold"],
                    &["altinfiyat", "altinyatirim", "altinborsa", "altinpiyasa", "gramaltın", "altinanaliz", "goldturkey", "altinmarket"],
                ),
                bucket(
                    &["bitcoin", "btc"],
                    &["bitcointr", "btcturkey", "bitcoinfiyat", "bitcoinanaliz", "kriptopara", "bitcoinhaber", "btcmarket", "bitcoinpro"],
                ),
                bucket(
                    &["dolar", "usd"],
                    &["dolarkuru", "usdtry", "doviz", "dolaranaliz", "kurlar", "dolarmarket", "usdturkey", "dovizpro"],
                ),
                bucket(
                    &["emlak", "ev"],
                    &["emlaktr", "evmarket", "emlakpro", "gayrimenkul", "evbul", "emlakhub", "konutmarket", "emlakanaliz"],
                ),
                bucket(
                    &["araba", "otomobil"],
                    &["arabatr", "otomarket", "arabapro", "otomobilhub", "arababulcom", "otoanaliz", "arabamarket", "otopro"],
                ),
            ],
        );
        topic_buckets.insert(
            "US".to_string(),
            vec![
                bucket(
                    &["gold"],
                    &["goldprice", "goldinvest", "goldmarket", "goldbullion", "goldtrader", "buygold"],
                ),
                bucket(
                    &["bitcoin", "btc"],
                    &["bitcoinnews", "btcprice", "bitcoininvest", "cryptobtc", "btcmarket", "bitcoinpro"],
                ),
            ],
        );

        let mut extension_scores = HashMap::new();
        for (ext, score) in [
            ("com", 30),
            ("net", 20),
            ("org", 25),
            ("info", 15),
            ("biz", 10),
            ("com.tr", 25),
            ("net.tr", 15),
            ("org.tr", 20),
        ] {
            extension_scores.insert(ext.to_string(), score);
        }

        let mut extension_age_ranges = HashMap::new();
        for (ext, range) in [
            ("com", AgeRange::new(2, 20)),
            ("net", AgeRange::new(1, 15)),
            ("org", AgeRange::new(3, 18)),
            ("info", AgeRange::new(1, 12)),
            ("biz", AgeRange::new(1, 10)),
            ("com.tr", AgeRange::new(1, 15)),
            ("net.tr", AgeRange::new(1, 12)),
            (DEFAULT_KEY, AgeRange::new(1, 10)),
        ] {
            extension_age_ranges.insert(ext.to_string(), range);
        }

        let mut trend_variants = HashMap::new();
        trend_variants.insert(
            "TR".to_string(),
            vec![TrendVariants {
                trigger: "altın".to_string(),
                variants: strings(&["altın", "gram altın", "altın fiyatı"]),
            }],
        );

        let mut related_queries = HashMap::new();
        related_queries.insert(
            "TR".to_string(),
            vec![
                fixed(
                    "altın",
                    &[("altın fiyatı", 85), ("gram altın", 78), ("çeyrek altın", 65), ("altın yatırım", 45), ("altın alım satım", 38)],
                ),
                fixed(
                    "bitcoin",
                    &[("bitcoin fiyat", 92), ("btc türkiye", 67), ("kripto para", 54), ("bitcoin al", 43)],
                ),
                fixed(
                    "dolar",
                    &[("dolar kuru", 95), ("usd try", 88), ("amerikan doları", 72), ("dolar yorum", 56)],
                ),
                fixed(
                    DEFAULT_KEY,
                    &[("{keyword} fiyat", 70), ("{keyword} türkiye", 60), ("{keyword} nasıl", 50), ("{keyword} nedir", 40)],
                ),
            ],
        );
        related_queries.insert(
            DEFAULT_KEY.to_string(),
            vec![fixed(
                DEFAULT_KEY,
                &[("{keyword} price", 75), ("{keyword} buy", 65), ("{keyword} review", 55), ("{keyword} best", 45)],
            )],
        );

        let mut rising_queries = HashMap::new();
        rising_queries.insert(
            "TR".to_string(),
            vec![
                drawn("altın", &["altın fiyatları", "altın borsa", "altın grafik", "altın analiz"]),
                drawn("bitcoin", &["bitcoin ne zaman alınır", "bitcoin geleceği", "bitcoin analiz"]),
                drawn("dolar", &["dolar ne olur", "dolar analiz", "dolar beklenti"]),
                drawn(DEFAULT_KEY, &["{keyword} nedir", "{keyword} nasıl", "{keyword} fiyat"]),
            ],
        );
        rising_queries.insert(
            "US".to_string(),
            vec![
                drawn("gold", &["gold price", "gold investment", "gold market", "gold analysis"]),
                drawn("bitcoin", &["bitcoin price prediction", "bitcoin investment", "bitcoin news"]),
                drawn(DEFAULT_KEY, &["{keyword} price", "{keyword} market", "{keyword} analysis"]),
            ],
        );
        rising_queries.insert(
            DEFAULT_KEY.to_string(),
            vec![drawn(DEFAULT_KEY, &["{keyword} analysis", "{keyword} trends", "{keyword} market"])],
        );

        let mut local_suggestions = HashMap::new();
        local_suggestions.insert(
            "TR".to_string(),
            vec![
                drawn("altın", &["altın fiyatı", "gram altın", "çeyrek altın", "altın yatırım", "altın borsa", "altın grafik"]),
                drawn("bitcoin", &["bitcoin fiyat", "btc", "kripto para", "bitcoin türkiye", "bitcoin al", "bitcoin analiz"]),
                drawn("dolar", &["dolar kuru", "usd try", "amerikan doları", "dolar yorum", "dolar analiz"]),
                drawn("euro", &["euro kuru", "eur try", "euro dolar", "euro analiz"]),
                drawn("emlak", &["emlak fiyatları", "ev fiyatları", "konut", "gayrimenkul"]),
                drawn("borsa", &["borsa istanbul", "hisse", "bist", "borsa analiz"]),
                drawn("petrol", &["petrol fiyatı", "ham petrol", "benzin fiyat"]),
                drawn(DEFAULT_KEY, &["{keyword} fiyat", "{keyword} türkiye", "{keyword} analiz", "{keyword} nedir"]),
            ],
        );
        local_suggestions.insert(
            "US".to_string(),
            vec![
                drawn("gold", &["gold price", "gold investment", "gold market", "gold futures"]),
                drawn("bitcoin", &["bitcoin price", "btc usd", "crypto", "bitcoin news"]),
                drawn("stock", &["stock market", "stocks", "nasdaq", "dow jones"]),
                drawn(DEFAULT_KEY, &["{keyword} price", "{keyword} market", "{keyword} news"]),
            ],
        );
        local_suggestions.insert(
            DEFAULT_KEY.to_string(),
            vec![drawn(
                DEFAULT_KEY,
                &["{keyword} analysis", "{keyword} trends", "{keyword} market", "{keyword} price"],
            )],
        );

        Self {
            extensions,
            stem_suffixes,
            stem_patterns: strings(&[
                "{stem}market",
                "{stem}hub",
                "{stem}pro",
                "my{stem}",
                "get{stem}",
                "{stem}online",
            ]),
            topic_buckets,
            premium_words: strings(&["market", "hub", "pro", "online", "get", "my", "best"]),
            legacy_words: strings(&["altın", "bitcoin", "dolar", "gold", "money", "news", "market", "trade"]),
            extension_scores,
            unknown_extension_score: 5,
            extension_age_ranges,
            trend_variants,
            related_queries,
            rising_queries,
            local_suggestions,
        }
    }
}
