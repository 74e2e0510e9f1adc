//! Fundmatch - compatibility scoring and ranking for business ideas and investment offers
//!
//! This library provides the matching engine used to pair creators' business ideas
//! with investors' offers. It scores every candidate pair across four weighted
//! dimensions and ranks the results for a given user.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod services;
pub mod worker;

// Re-export commonly used types
pub use crate::core::{MatchEngine, MatchPolicy, Scorer, Snapshot};
pub use error::{MatchError, RecordError};
pub use models::{
    BusinessIdea, FindMatchesRequest, FindMatchesResponse, InvestmentOffer, MatchResult,
    MatchStatistics, Role, ScoringWeights, UserProfile,
};
