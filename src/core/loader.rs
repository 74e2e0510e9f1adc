use std::collections::{BTreeSet, HashMap};

use crate::core::filters::{is_matchable_idea, is_matchable_offer};
use crate::error::RecordError;
use crate::models::{
    BusinessIdea, IdeaRecord, InvestmentOffer, OfferRecord, ProfileRecord, RawSnapshot, RiskLevel,
    Role, UserProfile,
};

/// Counts of what happened to each input collection while loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub profiles_loaded: usize,
    pub profiles_skipped: usize,
    pub ideas_loaded: usize,
    pub ideas_skipped: usize,
    pub ideas_ineligible: usize,
    pub offers_loaded: usize,
    pub offers_skipped: usize,
    pub offers_ineligible: usize,
}

impl LoadReport {
    pub fn total_skipped(&self) -> usize {
        self.profiles_skipped + self.ideas_skipped + self.offers_skipped
    }
}

/// In-memory working set for one matching run
///
/// Holds only matchable records (published ideas, active offers), indexed
/// by id and by owning user id.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    profiles: HashMap<String, UserProfile>,
    ideas: Vec<BusinessIdea>,
    offers: Vec<InvestmentOffer>,
    idea_ids: HashMap<String, usize>,
    offer_ids: HashMap<String, usize>,
    ideas_by_creator: HashMap<String, Vec<usize>>,
    offers_by_investor: HashMap<String, Vec<usize>>,
}

impl Snapshot {
    /// Build a snapshot from raw feed records, skipping anything malformed
    pub fn load(
        profiles: Vec<ProfileRecord>,
        ideas: Vec<IdeaRecord>,
        offers: Vec<OfferRecord>,
    ) -> (Self, LoadReport) {
        let mut snapshot = Self::default();
        let mut report = LoadReport::default();

        for record in profiles {
            match UserProfile::try_from(record) {
                Ok(profile) => snapshot.insert_profile(profile, &mut report),
                Err(e) => skip("profile", None, &e, &mut report.profiles_skipped),
            }
        }

        for record in ideas {
            let id = record.document_id.clone().or_else(|| record.id.clone());
            match BusinessIdea::try_from(record) {
                Ok(idea) => snapshot.insert_idea(idea, &mut report),
                Err(e) => skip("idea", id.as_deref(), &e, &mut report.ideas_skipped),
            }
        }

        for record in offers {
            let id = record.document_id.clone().or_else(|| record.id.clone());
            match InvestmentOffer::try_from(record) {
                Ok(offer) => snapshot.insert_offer(offer, &mut report),
                Err(e) => skip("offer", id.as_deref(), &e, &mut report.offers_skipped),
            }
        }

        snapshot.log_report(&report);
        (snapshot, report)
    }

    pub fn from_raw(raw: RawSnapshot) -> (Self, LoadReport) {
        Self::load(raw.profiles, raw.ideas, raw.offers)
    }

    /// Build a snapshot from already-typed records
    ///
    /// Eligibility and duplicate rules still apply.
    pub fn from_records(
        profiles: Vec<UserProfile>,
        ideas: Vec<BusinessIdea>,
        offers: Vec<InvestmentOffer>,
    ) -> (Self, LoadReport) {
        let mut snapshot = Self::default();
        let mut report = LoadReport::default();

        for profile in profiles {
            snapshot.insert_profile(profile, &mut report);
        }
        for idea in ideas {
            snapshot.insert_idea(idea, &mut report);
        }
        for offer in offers {
            snapshot.insert_offer(offer, &mut report);
        }

        snapshot.log_report(&report);
        (snapshot, report)
    }

    fn insert_profile(&mut self, profile: UserProfile, report: &mut LoadReport) {
        if self.profiles.contains_key(&profile.user_id) {
            tracing::warn!("Skipping duplicate profile {}", profile.user_id);
            report.profiles_skipped += 1;
            return;
        }

        self.profiles.insert(profile.user_id.clone(), profile);
        report.profiles_loaded += 1;
    }

    fn insert_idea(&mut self, idea: BusinessIdea, report: &mut LoadReport) {
        if !is_matchable_idea(&idea) {
            tracing::debug!("Ignoring idea {} with status {:?}", idea.id, idea.status);
            report.ideas_ineligible += 1;
            return;
        }

        if self.idea_ids.contains_key(&idea.id) {
            tracing::warn!("Skipping duplicate idea {}", idea.id);
            report.ideas_skipped += 1;
            return;
        }

        let index = self.ideas.len();
        self.idea_ids.insert(idea.id.clone(), index);
        self.ideas_by_creator
            .entry(idea.creator_id.clone())
            .or_default()
            .push(index);
        self.ideas.push(idea);
        report.ideas_loaded += 1;
    }

    fn insert_offer(&mut self, offer: InvestmentOffer, report: &mut LoadReport) {
        if !is_matchable_offer(&offer) {
            tracing::debug!("Ignoring inactive offer {}", offer.id);
            report.offers_ineligible += 1;
            return;
        }

        if self.offer_ids.contains_key(&offer.id) {
            tracing::warn!("Skipping duplicate offer {}", offer.id);
            report.offers_skipped += 1;
            return;
        }

        let index = self.offers.len();
        self.offer_ids.insert(offer.id.clone(), index);
        self.offers_by_investor
            .entry(offer.investor_id.clone())
            .or_default()
            .push(index);
        self.offers.push(offer);
        report.offers_loaded += 1;
    }

    fn log_report(&self, report: &LoadReport) {
        tracing::debug!(
            "Loaded snapshot: {} profiles, {} ideas, {} offers ({} records skipped)",
            report.profiles_loaded,
            report.ideas_loaded,
            report.offers_loaded,
            report.total_skipped()
        );
    }

    pub fn profile(&self, user_id: &str) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    pub fn idea(&self, idea_id: &str) -> Option<&BusinessIdea> {
        self.idea_ids.get(idea_id).map(|&i| &self.ideas[i])
    }

    pub fn offer(&self, offer_id: &str) -> Option<&InvestmentOffer> {
        self.offer_ids.get(offer_id).map(|&i| &self.offers[i])
    }

    pub fn ideas(&self) -> &[BusinessIdea] {
        &self.ideas
    }

    pub fn offers(&self) -> &[InvestmentOffer] {
        &self.offers
    }

    pub fn profiles(&self) -> impl Iterator<Item = &UserProfile> {
        self.profiles.values()
    }

    /// Published ideas owned by a creator, in load order
    pub fn ideas_owned_by<'a>(&'a self, creator_id: &str) -> impl Iterator<Item = &'a BusinessIdea> + 'a {
        self.ideas_by_creator
            .get(creator_id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.ideas[i])
    }

    /// Active offers owned by an investor, in load order
    pub fn offers_owned_by<'a>(&'a self, investor_id: &str) -> impl Iterator<Item = &'a InvestmentOffer> + 'a {
        self.offers_by_investor
            .get(investor_id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.offers[i])
    }

    /// Whether the user owns anything or has a profile in this snapshot
    pub fn knows_user(&self, user_id: &str) -> bool {
        self.profiles.contains_key(user_id)
            || self.ideas_by_creator.contains_key(user_id)
            || self.offers_by_investor.contains_key(user_id)
    }

    /// Every (user, role) worth matching for, sorted
    ///
    /// Covers profiles under their declared role plus anyone owning an idea
    /// (as creator) or an offer (as investor), even when their profile was
    /// missing or rejected.
    pub fn participants(&self) -> Vec<(String, Role)> {
        let owners = self
            .ideas_by_creator
            .keys()
            .map(|id| (id.clone(), Role::Creator))
            .chain(
                self.offers_by_investor
                    .keys()
                    .map(|id| (id.clone(), Role::Investor)),
            );

        self.profiles
            .values()
            .map(|p| (p.user_id.clone(), p.role))
            .chain(owners)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn risk_tolerance_of(&self, investor_id: &str) -> Option<RiskLevel> {
        self.profiles
            .get(investor_id)
            .and_then(|profile| profile.risk_tolerance)
    }
}

fn skip(kind: &str, id: Option<&str>, error: &RecordError, counter: &mut usize) {
    tracing::warn!(
        "Skipping malformed {} {}: {}",
        kind,
        id.unwrap_or("<no id>"),
        error
    );
    *counter += 1;
}
