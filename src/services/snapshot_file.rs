use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::models::{IdeaRecord, OfferRecord, ProfileRecord, RawSnapshot};
use crate::services::feed::{decode_documents, FeedError, SnapshotSource};

/// Snapshot read from a JSON export on disk
///
/// The file holds `{"profiles": [...], "ideas": [...], "offers": [...]}`.
/// Records are decoded one at a time so a single bad entry does not sink
/// the whole file.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

#[derive(Deserialize)]
struct SnapshotDocuments {
    #[serde(default)]
    profiles: Vec<Value>,
    #[serde(default)]
    ideas: Vec<Value>,
    #[serde(default)]
    offers: Vec<Value>,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode snapshot JSON already in memory
    pub fn parse(json: &str) -> Result<RawSnapshot, FeedError> {
        let documents: SnapshotDocuments = serde_json::from_str(json)?;

        Ok(RawSnapshot {
            profiles: decode_documents::<ProfileRecord>("profile", &documents.profiles),
            ideas: decode_documents::<IdeaRecord>("idea", &documents.ideas),
            offers: decode_documents::<OfferRecord>("offer", &documents.offers),
        })
    }
}

impl SnapshotSource for SnapshotFile {
    async fn fetch_snapshot(&self) -> Result<RawSnapshot, FeedError> {
        tracing::debug!("Reading snapshot from {}", self.path.display());
        let json = tokio::fs::read_to_string(&self.path).await?;
        Self::parse(&json)
    }
}
