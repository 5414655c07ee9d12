//! SEO Forge - keyword-driven domain appraisal
//!
//! Generates candidate domain names for a keyword and locale, ranks them by
//! an estimated SEO value, searches for names above a backlink floor, and
//! fetches keyword trends through an ordered provider fallback chain.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod seo;
pub mod tables;
pub mod trends;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SeoForgeError};
pub use types::{
    AvailabilityReport, AvailabilityStatus, BacklinkDomain, DomainAge, DomainAssessment, Factor,
    Locale, ScoreFactors, WhoisRecord,
};

// Re-export main functionality
pub use api::{Envelope, SeoForge};
pub use config::Settings;
pub use seo::{RankingPipeline, Simulation};
pub use tables::LocaleTables;
pub use trends::{FallbackChain, TrendReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
