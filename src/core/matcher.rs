use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::core::{
    filters::{is_candidate_pair, meets_threshold},
    loader::Snapshot,
    scoring::{Scorer, DEFAULT_AMOUNT_FALLOFF},
    statistics::summarize,
};
use crate::error::MatchError;
use crate::models::{
    BusinessIdea, FindMatchesRequest, FindMatchesResponse, InvestmentOffer, MatchResult,
    MatchStatistics, RiskCredit, Role, ScoringWeights, StatisticsRequest,
};

/// Tunable matching policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    pub weights: ScoringWeights,
    pub risk_credit: RiskCredit,
    pub amount_falloff: f64,
    /// Pairs scoring below this are not worth surfacing
    pub min_score: u8,
    /// Hard cap on any caller-supplied limit
    pub max_limit: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            risk_credit: RiskCredit::default(),
            amount_falloff: DEFAULT_AMOUNT_FALLOFF,
            min_score: 40,
            max_limit: 100,
        }
    }
}

/// A scored pair together with its tie-break keys
struct RankedMatch {
    result: MatchResult,
    counterpart_created: Option<DateTime<Utc>>,
    own_created: Option<DateTime<Utc>>,
}

/// Matching engine over one snapshot
///
/// # Pipeline Stages
/// 1. Enumerate the user's own ideas (creator) or offers (investor)
/// 2. Pair each with every counterpart record owned by someone else
/// 3. Score every pair and drop those under the threshold
/// 4. Rank and truncate
#[derive(Debug, Clone)]
pub struct MatchEngine {
    snapshot: Snapshot,
    scorer: Scorer,
    min_score: u8,
    max_limit: usize,
}

impl MatchEngine {
    pub fn new(snapshot: Snapshot, policy: MatchPolicy) -> Result<Self, MatchError> {
        let scorer = Scorer::new(policy.weights, policy.risk_credit, policy.amount_falloff)?;

        Ok(Self {
            snapshot,
            scorer,
            min_score: policy.min_score,
            max_limit: policy.max_limit,
        })
    }

    pub fn with_default_policy(snapshot: Snapshot) -> Self {
        let policy = MatchPolicy::default();
        Self {
            snapshot,
            scorer: Scorer::default(),
            min_score: policy.min_score,
            max_limit: policy.max_limit,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn min_score(&self) -> u8 {
        self.min_score
    }

    /// Find the best counterpart matches for a user
    ///
    /// # Arguments
    /// * `user_id` - The creator or investor to match for
    /// * `role` - Which side the user is matched from
    /// * `limit` - Maximum number of matches to return (capped at the policy maximum)
    ///
    /// # Returns
    /// Matches sorted by score descending; empty when there is nothing to match
    pub fn find_matches(&self, user_id: &str, role: Role, limit: usize) -> Vec<MatchResult> {
        if limit > self.max_limit {
            tracing::debug!(
                "Requested limit {} for {} capped at {}",
                limit,
                user_id,
                self.max_limit
            );
        }

        let limit = limit.min(self.max_limit);
        if limit == 0 {
            return Vec::new();
        }

        let mut matches = self.ranked_matches(user_id, role);
        matches.truncate(limit);

        tracing::debug!(
            "Returning {} matches for {} {} (limit {})",
            matches.len(),
            role,
            user_id,
            limit
        );

        matches
    }

    /// Aggregate statistics over the user's full thresholded match set
    pub fn get_statistics(&self, user_id: &str, role: Role) -> MatchStatistics {
        summarize(&self.ranked_matches(user_id, role))
    }

    /// Validate and answer a find-matches request
    pub fn handle_find(&self, req: &FindMatchesRequest) -> Result<FindMatchesResponse, MatchError> {
        let role = req.parse_role()?;
        let matches = self.find_matches(&req.user_id, role, usize::from(req.limit));

        Ok(FindMatchesResponse {
            user_id: req.user_id.clone(),
            role,
            total_results: matches.len(),
            matches,
        })
    }

    /// Validate and answer a statistics request
    pub fn handle_statistics(&self, req: &StatisticsRequest) -> Result<MatchStatistics, MatchError> {
        let role = req.parse_role()?;
        Ok(self.get_statistics(&req.user_id, role))
    }

    /// Every thresholded match for the user, fully ordered
    fn ranked_matches(&self, user_id: &str, role: Role) -> Vec<MatchResult> {
        if !self.snapshot.knows_user(user_id) {
            tracing::debug!("Unknown user {}, no matches", user_id);
            return Vec::new();
        }

        if let Some(profile) = self.snapshot.profile(user_id) {
            if profile.role != role {
                tracing::debug!(
                    "User {} is a {} but was matched as {}",
                    user_id,
                    profile.role,
                    role
                );
            }
        }

        let mut ranked: Vec<RankedMatch> = match role {
            Role::Creator => self
                .snapshot
                .ideas_owned_by(user_id)
                .flat_map(|idea| {
                    self.snapshot
                        .offers()
                        .iter()
                        .filter_map(move |offer| self.score_pair(idea, offer, role))
                })
                .collect(),
            Role::Investor => self
                .snapshot
                .offers_owned_by(user_id)
                .flat_map(|offer| {
                    self.snapshot
                        .ideas()
                        .iter()
                        .filter_map(move |idea| self.score_pair(idea, offer, role))
                })
                .collect(),
        };

        ranked.sort_by(compare_ranked);

        ranked.into_iter().map(|r| r.result).collect()
    }

    fn score_pair(
        &self,
        idea: &BusinessIdea,
        offer: &InvestmentOffer,
        role: Role,
    ) -> Option<RankedMatch> {
        if !is_candidate_pair(idea, offer) {
            return None;
        }

        let compatibility = self.scorer.score(
            idea,
            offer,
            self.snapshot.risk_tolerance_of(&offer.investor_id),
        );

        if !meets_threshold(compatibility.overall, self.min_score) {
            return None;
        }

        let (counterpart_created, own_created) = match role {
            Role::Creator => (offer.created_at, idea.created_at),
            Role::Investor => (idea.created_at, offer.created_at),
        };

        Some(RankedMatch {
            result: MatchResult {
                idea_id: idea.id.clone(),
                offer_id: offer.id.clone(),
                creator_id: idea.creator_id.clone(),
                investor_id: offer.investor_id.clone(),
                match_score: compatibility.overall,
                matching_factors: compatibility.factors,
            },
            counterpart_created,
            own_created,
        })
    }
}

/// Score descending, then most recently created counterpart, then most
/// recently created own record (missing timestamps last), then ids.
fn compare_ranked(a: &RankedMatch, b: &RankedMatch) -> Ordering {
    b.result
        .match_score
        .cmp(&a.result.match_score)
        .then_with(|| b.counterpart_created.cmp(&a.counterpart_created))
        .then_with(|| b.own_created.cmp(&a.own_created))
        .then_with(|| a.result.idea_id.cmp(&b.result.idea_id))
        .then_with(|| a.result.offer_id.cmp(&b.result.offer_id))
}
