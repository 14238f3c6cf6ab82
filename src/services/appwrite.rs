use crate::models::VehicleListing;
use crate::services::inventory::{InventoryError, InventorySource};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Inventory backed by an Appwrite listings collection
pub struct AppwriteInventory {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    collection_id: String,
    page_limit: usize,
    client: Client,
}

impl AppwriteInventory {
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collection_id: String,
        page_limit: usize,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build Appwrite HTTP client ({}), using defaults", e);
                Client::new()
            });

        Self {
            base_url,
            api_key,
            project_id,
            database_id,
            collection_id,
            page_limit: page_limit.max(1),
            client,
        }
    }

    fn documents_url(&self, offset: usize) -> String {
        let limit = format!("limit({})", self.page_limit);
        let offset = format!("offset({})", offset);
        format!(
            "{}/databases/{}/collections/{}/documents?queries[]={}&queries[]={}",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collection_id,
            urlencoding::encode(&limit),
            urlencoding::encode(&offset)
        )
    }

    /// Fetch one page of raw documents and the collection total, if reported
    async fn fetch_page(&self, offset: usize) -> Result<(Vec<Value>, Option<usize>), InventoryError> {
        let url = self.documents_url(offset);

        tracing::debug!("Fetching listings from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(InventoryError::ApiError(format!(
                "Failed to list documents: {}",
                response.status()
            )));
        }

        let mut json: Value = response.json().await?;

        let total = json.get("total").and_then(Value::as_u64).map(|t| t as usize);
        let documents = match json.get_mut("documents").map(Value::take) {
            Some(Value::Array(docs)) => docs,
            _ => return Err(InventoryError::InvalidResponse("Missing documents array".into())),
        };

        Ok((documents, total))
    }
}

/// Extract a listing from an Appwrite document, falling back to `$id` for the id
fn listing_from_document(doc: &Value) -> Option<VehicleListing> {
    let mut data = doc.get("data").unwrap_or(doc).clone();

    if let Some(obj) = data.as_object_mut() {
        if !obj.contains_key("id") {
            if let Some(doc_id) = doc.get("$id").cloned() {
                obj.insert("id".to_string(), doc_id);
            }
        }
    }

    match serde_json::from_value(data) {
        Ok(listing) => Some(listing),
        Err(e) => {
            tracing::debug!("Skipping malformed listing document: {}", e);
            None
        }
    }
}

#[async_trait]
impl InventorySource for AppwriteInventory {
    /// Every listing in the collection, paging until a short page or the reported total
    async fn listings(&self) -> Result<Vec<VehicleListing>, InventoryError> {
        let mut listings = Vec::new();
        let mut offset = 0;

        loop {
            let (documents, total) = self.fetch_page(offset).await?;
            let fetched = documents.len();

            listings.extend(documents.iter().filter_map(listing_from_document));
            offset += fetched;

            if fetched < self.page_limit || total.is_some_and(|t| offset >= t) {
                break;
            }
        }

        tracing::debug!("Loaded {} of {} listing documents", listings.len(), offset);

        Ok(listings)
    }
}
