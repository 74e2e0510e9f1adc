use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

use crate::models::{MatchRecord, RawSnapshot};
use crate::services::appwrite::AppwriteError;

/// Errors raised while pulling a snapshot or publishing results
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Document store error: {0}")]
    Appwrite(#[from] AppwriteError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Something that can deliver the three input collections on demand
pub trait SnapshotSource {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<RawSnapshot, FeedError>> + Send;
}

/// Something that persists match results on the caller's behalf
pub trait MatchSink {
    /// Store one match, returning the id it was stored under
    fn publish(&self, record: &MatchRecord) -> impl Future<Output = Result<String, FeedError>> + Send;
}

/// Decode raw documents into records, skipping any that do not fit
///
/// Documents carry their attributes either at the top level or under `data`.
pub fn decode_documents<T: DeserializeOwned>(kind: &str, documents: &[Value]) -> Vec<T> {
    documents
        .iter()
        .filter_map(|doc| {
            match serde_json::from_value(document_attributes(doc)) {
                Ok(record) => Some(record),
                Err(e) => {
                    let id = doc.get("$id").and_then(Value::as_str).unwrap_or("<no id>");
                    tracing::warn!("Skipping undecodable {} document {}: {}", kind, id, e);
                    None
                }
            }
        })
        .collect()
}

/// Attributes of one document, with `$`-prefixed system fields such as `$id`
/// and `$createdAt` carried down into a `data` object
fn document_attributes(doc: &Value) -> Value {
    match (doc.get("data").and_then(Value::as_object), doc.as_object()) {
        (Some(data), Some(top)) => {
            let mut merged = data.clone();
            for (key, value) in top.iter().filter(|(key, _)| key.starts_with('$')) {
                merged.entry(key.clone()).or_insert_with(|| value.clone());
            }
            Value::Object(merged)
        }
        _ => doc.clone(),
    }
}
