//! Runtime settings read from the environment

use crate::error::{Result, SeoForgeError};
use crate::tables::LocaleTables;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_PROBE_DELAY_MS: &str = "SEO_FORGE_PROBE_DELAY_MS";
pub const ENV_TREND_DELAY_MS: &str = "SEO_FORGE_TREND_DELAY_MS";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "SEO_FORGE_PROBE_TIMEOUT_SECS";
pub const ENV_TABLES: &str = "SEO_FORGE_TABLES";
pub const ENV_SEED: &str = "SEO_FORGE_SEED";

/// Settings shared by the pipeline, the probes and the trend chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Pause between successive candidate probes
    pub probe_delay_ms: u64,
    /// Pause between trend attempts; the related-query call waits half
    pub trend_delay_ms: u64,
    pub probe_timeout_secs: u64,
    pub tables_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            probe_delay_ms: 500,
            trend_delay_ms: 2000,
            probe_timeout_secs: 10,
            tables_path: None,
            seed: None,
        }
    }
}

impl Settings {
    /// Read settings from environment variables, defaults for anything unset
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            probe_delay_ms: parse_number(ENV_PROBE_DELAY_MS, value(ENV_PROBE_DELAY_MS))?
                .unwrap_or(defaults.probe_delay_ms),
            trend_delay_ms: parse_number(ENV_TREND_DELAY_MS, value(ENV_TREND_DELAY_MS))?
                .unwrap_or(defaults.trend_delay_ms),
            probe_timeout_secs: parse_number(ENV_PROBE_TIMEOUT_SECS, value(ENV_PROBE_TIMEOUT_SECS))?
                .unwrap_or(defaults.probe_timeout_secs),
            tables_path: value(ENV_TABLES).map(PathBuf::from),
            seed: parse_number(ENV_SEED, value(ENV_SEED))?,
        })
    }

    /// Settings with every delay disabled, for tests and offline runs
    pub fn without_delays() -> Self {
        Self {
            probe_delay_ms: 0,
            trend_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn probe_delay(&self) -> Duration {
        Duration::from_millis(self.probe_delay_ms)
    }

    pub fn trend_delay(&self) -> Duration {
        Duration::from_millis(self.trend_delay_ms)
    }

    pub fn related_delay(&self) -> Duration {
        Duration::from_millis(self.trend_delay_ms / 2)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Load data tables from `tables_path`, or the built-in ones
    pub fn load_tables(&self) -> Result<LocaleTables> {
        match &self.tables_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading data tables");
                LocaleTables::load(path)
            }
            None => Ok(LocaleTables::default()),
        }
    }
}

fn parse_number(key: &str, raw: Option<String>) -> Result<Option<u64>> {
    raw.map(|v| {
        v.parse::<u64>()
            .map_err(|_| SeoForgeError::config(format!("{} must be a non-negative integer, got '{}'", key, v)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.related_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_PROBE_DELAY_MS, "0"),
            (ENV_SEED, " 42 "),
            (ENV_TABLES, "/tmp/tables.toml"),
        ]))
        .unwrap();
        assert_eq!(settings.probe_delay_ms, 0);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.tables_path, Some(PathBuf::from("/tmp/tables.toml")));
    }

    #[test]
    fn test_invalid_number() {
        let err = Settings::from_lookup(lookup(&[(ENV_PROBE_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert!(matches!(err, SeoForgeError::Config { .. }));
        assert!(err.to_string().contains(ENV_PROBE_TIMEOUT_SECS));
    }

    #[test]
    fn test_builtin_tables_without_path() {
        let tables = Settings::default().load_tables().unwrap();
        assert_eq!(tables, LocaleTables::default());
    }
}
