use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{MatchResult, MatchingFactors, Role};

/// Response for a find-matches query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesResponse {
    pub user_id: String,
    pub role: Role,
    pub matches: Vec<MatchResult>,
    pub total_results: usize,
}

/// Histogram of match scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    #[serde(rename = "below40")]
    pub below_40: usize,
    #[serde(rename = "40-59")]
    pub from_40_to_59: usize,
    #[serde(rename = "60-79")]
    pub from_60_to_79: usize,
    #[serde(rename = "80-100")]
    pub from_80_to_100: usize,
}

/// Aggregate view over a participant's match set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatistics {
    pub count: usize,
    pub average_score: f64,
    pub highest_score: Option<u8>,
    pub distribution: ScoreDistribution,
}

/// Persisted form of a match, written by the refresh worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub idea_id: String,
    pub offer_id: String,
    pub creator_id: String,
    pub investor_id: String,
    pub match_score: u8,
    pub matching_factors: MatchingFactors,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn pending(result: &MatchResult, created_at: DateTime<Utc>) -> Self {
        Self {
            idea_id: result.idea_id.clone(),
            offer_id: result.offer_id.clone(),
            creator_id: result.creator_id.clone(),
            investor_id: result.investor_id.clone(),
            match_score: result.match_score,
            matching_factors: result.matching_factors,
            status: "pending".to_string(),
            created_at,
        }
    }
}
