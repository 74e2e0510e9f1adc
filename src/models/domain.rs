use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MatchError;

/// Which side of the marketplace a participant is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Creator,
    Investor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Creator => "creator",
            Role::Investor => "investor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "creator" => Ok(Role::Creator),
            "investor" => Ok(Role::Investor),
            _ => Err(MatchError::InvalidRole(s.to_string())),
        }
    }
}

/// Risk appetite of an investor, or risk implied by a business stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Number of steps between two levels (0 = same, 2 = opposite extremes)
    pub fn distance(self, other: RiskLevel) -> u8 {
        (self as u8).abs_diff(other as u8)
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(other.to_string()),
        }
    }
}

/// Business maturity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessStage {
    Concept,
    Mvp,
    Early,
    Growth,
}

impl BusinessStage {
    /// Risk an investor takes on by funding a business at this stage
    pub fn implied_risk(self) -> RiskLevel {
        match self {
            BusinessStage::Concept | BusinessStage::Mvp => RiskLevel::High,
            BusinessStage::Early => RiskLevel::Medium,
            BusinessStage::Growth => RiskLevel::Low,
        }
    }
}

impl FromStr for BusinessStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concept" => Ok(BusinessStage::Concept),
            "mvp" => Ok(BusinessStage::Mvp),
            "early" => Ok(BusinessStage::Early),
            "growth" => Ok(BusinessStage::Growth),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeaStatus {
    Draft,
    Published,
    Funded,
    Cancelled,
}

impl FromStr for IdeaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(IdeaStatus::Draft),
            "published" => Ok(IdeaStatus::Published),
            "funded" => Ok(IdeaStatus::Funded),
            "cancelled" | "canceled" => Ok(IdeaStatus::Cancelled),
            other => Err(other.to_string()),
        }
    }
}

/// Currency amount bounds, `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
}

impl AmountRange {
    /// Inclusive on both bounds
    #[inline]
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// Equity percentage bounds (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityRange {
    pub min: f64,
    pub max: f64,
}

/// A marketplace participant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub role: Role,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub investment_range: Option<AmountRange>,
    #[serde(default)]
    pub preferred_industries: Vec<String>,
    #[serde(default)]
    pub risk_tolerance: Option<RiskLevel>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A creator's funding request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessIdea {
    pub id: String,
    pub creator_id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub funding_goal: f64,
    pub equity_offered: f64,
    pub category: String,
    pub stage: BusinessStage,
    pub status: IdeaStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An investor's funding criteria
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentOffer {
    pub id: String,
    pub investor_id: String,
    pub amount_range: AmountRange,
    #[serde(default)]
    pub preferred_equity: Option<EquityRange>,
    #[serde(default)]
    pub preferred_stages: Vec<BusinessStage>,
    #[serde(default)]
    pub preferred_industries: Vec<String>,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Per-dimension compatibility, each 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingFactors {
    pub amount_compatibility: u8,
    pub industry_alignment: u8,
    pub stage_preference: u8,
    pub risk_alignment: u8,
}

/// Scored pairing of one idea and one offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub idea_id: String,
    pub offer_id: String,
    pub creator_id: String,
    pub investor_id: String,
    pub match_score: u8,
    pub matching_factors: MatchingFactors,
}

/// Scoring weights, must sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub amount: f64,
    pub industry: f64,
    pub stage: f64,
    pub risk: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            amount: 0.35,
            industry: 0.30,
            stage: 0.20,
            risk: 0.15,
        }
    }
}

/// Risk alignment credit by distance between implied risk and tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCredit {
    pub exact: u8,
    pub adjacent: u8,
    pub opposite: u8,
}

impl Default for RiskCredit {
    fn default() -> Self {
        Self {
            exact: 100,
            adjacent: 50,
            opposite: 0,
        }
    }
}
