use crate::models::{BusinessIdea, IdeaStatus, InvestmentOffer};

/// Check if an idea may take part in matching
///
/// Only published ideas are offered to investors; drafts, funded and
/// cancelled ideas never surface.
#[inline]
pub fn is_matchable_idea(idea: &BusinessIdea) -> bool {
    idea.status == IdeaStatus::Published
}

/// Check if an offer may take part in matching
#[inline]
pub fn is_matchable_offer(offer: &InvestmentOffer) -> bool {
    offer.is_active
}

/// A pair owned by the same user on both sides is never a match
#[inline]
pub fn is_self_pair(idea: &BusinessIdea, offer: &InvestmentOffer) -> bool {
    idea.creator_id == offer.investor_id
}

/// Check if a pair is worth scoring at all
#[inline]
pub fn is_candidate_pair(idea: &BusinessIdea, offer: &InvestmentOffer) -> bool {
    is_matchable_idea(idea) && is_matchable_offer(offer) && !is_self_pair(idea, offer)
}

/// Check if a scored pair clears the relevance cutoff
#[inline]
pub fn meets_threshold(score: u8, min_score: u8) -> bool {
    score >= min_score
}
