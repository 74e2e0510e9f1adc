use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::models::{IdeaRecord, MatchRecord, OfferRecord, ProfileRecord, RawSnapshot};
use crate::services::feed::{decode_documents, FeedError, MatchSink, SnapshotSource};

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or project")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub user_profiles: String,
    pub business_ideas: String,
    pub investment_offers: String,
    pub matches: String,
}

/// Appwrite API client
///
/// Handles all communication with the document store:
/// - Pulling profiles, published ideas and active offers
/// - Writing match documents
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
    page_size: usize,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
        page_size: usize,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
            page_size: page_size.max(1),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    /// List every document in a collection matching the given filters
    ///
    /// Pages through the collection with `limit`/`offset` until the reported
    /// `total` has been read. The server may cap `limit` below our page size,
    /// so a short page alone only ends the listing when `total` is absent.
    pub async fn list_documents(
        &self,
        collection: &str,
        filters: &[String],
    ) -> Result<Vec<Value>, AppwriteError> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();

        loop {
            let mut queries = filters.to_vec();
            queries.push(format!("limit({})", self.page_size));
            queries.push(format!("offset({})", documents.len()));

            let query_string = queries
                .iter()
                .map(|q| format!("queries[]={}", urlencoding::encode(q)))
                .collect::<Vec<_>>()
                .join("&");
            let full_url = format!("{}?{}", url, query_string);

            tracing::debug!("Listing documents from: {}", full_url);

            let response = self
                .client
                .get(&full_url)
                .header("X-Appwrite-Key", &self.api_key)
                .header("X-Appwrite-Project", &self.project_id)
                .send()
                .await?;

            let status = response.status();
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(AppwriteError::Unauthorized);
            }
            if !status.is_success() {
                return Err(AppwriteError::ApiError(format!(
                    "Failed to list {}: {}",
                    collection, status
                )));
            }

            let json: Value = response.json().await?;

            let total = json
                .get("total")
                .and_then(|t| t.as_u64())
                .map(|t| t as usize);

            let page = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

            let page_len = page.len();
            documents.extend(page.iter().cloned());

            let done = match total {
                Some(total) => page_len == 0 || documents.len() >= total,
                None => page_len < self.page_size,
            };
            if done {
                break;
            }
        }

        tracing::debug!("Listed {} documents from {}", documents.len(), collection);

        Ok(documents)
    }

    /// Create a match document, returning its generated id
    pub async fn create_match(&self, record: &MatchRecord) -> Result<String, AppwriteError> {
        let url = self.collection_url(&self.collections.matches);
        let document_id = uuid::Uuid::new_v4().to_string();

        let payload = json!({
            "documentId": document_id,
            "data": record,
        });

        let response = self
            .client
            .post(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppwriteError::Unauthorized);
        }
        if !status.is_success() {
            return Err(AppwriteError::ApiError(format!(
                "Failed to create match: {}",
                status
            )));
        }

        tracing::debug!(
            "Created match {}: {} <-> {}",
            document_id,
            record.idea_id,
            record.offer_id
        );

        Ok(document_id)
    }
}

impl SnapshotSource for AppwriteClient {
    async fn fetch_snapshot(&self) -> Result<RawSnapshot, FeedError> {
        let profile_docs = self
            .list_documents(&self.collections.user_profiles, &[])
            .await?;
        let idea_docs = self
            .list_documents(
                &self.collections.business_ideas,
                &[r#"equal("status", ["published"])"#.to_string()],
            )
            .await?;
        let offer_docs = self
            .list_documents(
                &self.collections.investment_offers,
                &[r#"equal("isActive", [true])"#.to_string()],
            )
            .await?;

        Ok(RawSnapshot {
            profiles: decode_documents::<ProfileRecord>("profile", &profile_docs),
            ideas: decode_documents::<IdeaRecord>("idea", &idea_docs),
            offers: decode_documents::<OfferRecord>("offer", &offer_docs),
        })
    }
}

impl MatchSink for AppwriteClient {
    async fn publish(&self, record: &MatchRecord) -> Result<String, FeedError> {
        Ok(self.create_match(record).await?)
    }
}
