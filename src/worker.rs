//! Refresh loop: pull a snapshot, re-score everyone, hand results to a sink.

use chrono::Utc;
use std::collections::HashSet;
use thiserror::Error;

use crate::core::{LoadReport, MatchEngine, MatchPolicy, Snapshot};
use crate::error::MatchError;
use crate::models::{MatchRecord, MatchResult};
use crate::services::{FeedError, MatchSink, RefreshTrigger, SnapshotSource};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Failed to pull snapshot: {0}")]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Outcome of one full re-score
#[derive(Debug, Clone, Default)]
pub struct RefreshSummary {
    pub load: LoadReport,
    pub users_matched: usize,
    pub users_without_matches: usize,
    /// Distinct pairs across every participant's top list
    pub matches: Vec<MatchResult>,
}

/// Pull one snapshot and compute every participant's top matches
///
/// A pair that appears in both the creator's and the investor's list is
/// reported once.
pub async fn refresh_once<S: SnapshotSource>(
    source: &S,
    policy: MatchPolicy,
    limit: usize,
) -> Result<RefreshSummary, RefreshError> {
    let raw = source.fetch_snapshot().await?;
    let (snapshot, load) = Snapshot::from_raw(raw);
    let engine = MatchEngine::new(snapshot, policy)?;

    let mut summary = RefreshSummary {
        load,
        ..Default::default()
    };
    let mut seen = HashSet::new();

    for (user_id, role) in engine.snapshot().participants() {
        let matches = engine.find_matches(&user_id, role, limit);
        if matches.is_empty() {
            summary.users_without_matches += 1;
            continue;
        }

        summary.users_matched += 1;
        for m in matches {
            if seen.insert((m.idea_id.clone(), m.offer_id.clone())) {
                summary.matches.push(m);
            }
        }
    }

    tracing::info!(
        "Refresh complete: {} users matched, {} without matches, {} distinct pairs ({} records skipped)",
        summary.users_matched,
        summary.users_without_matches,
        summary.matches.len(),
        summary.load.total_skipped()
    );

    Ok(summary)
}

/// Publish every match in a summary, returning how many were stored
///
/// Individual failures are logged and skipped.
pub async fn publish_all<K: MatchSink>(sink: &K, summary: &RefreshSummary) -> usize {
    let created_at = Utc::now();
    let mut published = 0;

    for m in &summary.matches {
        let record = MatchRecord::pending(m, created_at);
        match sink.publish(&record).await {
            Ok(id) => {
                tracing::debug!("Published match {} ({} <-> {})", id, m.idea_id, m.offer_id);
                published += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to publish match {} <-> {}: {}", m.idea_id, m.offer_id, e);
            }
        }
    }

    published
}

/// Re-score on every trigger until the trigger ends
///
/// A failed refresh is logged and the loop waits for the next trigger.
/// Returns the number of successful refreshes.
pub async fn run<S, T, K>(
    source: &S,
    trigger: &mut T,
    sink: Option<&K>,
    policy: MatchPolicy,
    limit: usize,
) -> usize
where
    S: SnapshotSource,
    T: RefreshTrigger,
    K: MatchSink,
{
    let mut completed = 0;

    while trigger.next_refresh().await {
        match refresh_once(source, policy, limit).await {
            Ok(summary) => {
                completed += 1;
                if let Some(sink) = sink {
                    let published = publish_all(sink, &summary).await;
                    tracing::info!("Published {}/{} matches", published, summary.matches.len());
                }
            }
            Err(e) => {
                tracing::warn!("Refresh failed, waiting for next trigger: {}", e);
            }
        }
    }

    completed
}
