// Model exports
pub mod domain;
pub mod records;
pub mod requests;
pub mod responses;

pub use domain::{
    AmountRange, BusinessIdea, BusinessStage, EquityRange, IdeaStatus, InvestmentOffer,
    MatchResult, MatchingFactors, RiskCredit, RiskLevel, Role, ScoringWeights, UserProfile,
};
pub use records::{IdeaRecord, OfferRecord, ProfileRecord, RangeRecord, RawSnapshot};
pub use requests::{FindMatchesRequest, StatisticsRequest};
pub use responses::{FindMatchesResponse, MatchRecord, MatchStatistics, ScoreDistribution};
