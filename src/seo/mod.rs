//! Candidate generation, scoring and ranking

pub mod age;
pub mod backlinks;
pub mod candidates;
pub mod pipeline;
pub mod quality;
pub mod relevance;
pub mod simulation;
pub mod value;

// Re-export main functionality
pub use age::AgeEstimator;
pub use backlinks::BacklinkEstimator;
pub use candidates::{CandidateDomain, CandidateGenerator, MAX_CANDIDATES};
pub use pipeline::{RankingPipeline, MIN_SEO_SCORE};
pub use quality::QualityScorer;
pub use relevance::RelevanceScorer;
pub use simulation::Simulation;
