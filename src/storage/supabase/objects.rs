use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use serde_json::json;

use super::client::{encode_object_path, Client};
use crate::error::{AppError, Result};
use crate::storage::ObjectStore;

/// Supabase Storage bucket
pub struct SupabaseStorage {
    client: Client,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(client: Client, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }

    fn object_url(&self, path: &str) -> String {
        self.client.storage_url(&format!(
            "object/{}/{}",
            self.bucket,
            encode_object_path(path)
        ))
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn put(&self, path: &str, data: Bytes) -> Result<()> {
        let mime_type = mime_guess::from_path(path).first_or_octet_stream();
        let size = data.len();

        let response = self
            .client
            .request(Method::POST, &self.object_url(path))
            .header(reqwest::header::CONTENT_TYPE, mime_type.as_ref())
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await?;
        Client::check(response, "Storage upload")
            .await
            .map_err(|e| match e {
                // A 404 here means the bucket is missing, not the object
                AppError::NotFound(msg) => AppError::Storage(msg),
                other => other,
            })?;

        tracing::info!("Uploaded {} ({} bytes) to bucket {}", path, size, self.bucket);
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<()> {
        let url = self.client.storage_url(&format!("object/{}", self.bucket));
        let response = self
            .client
            .request(Method::DELETE, &url)
            .json(&json!({ "prefixes": [path] }))
            .send()
            .await?;
        let response = Client::check(response, "Storage remove").await?;

        // The API answers 200 with the list of objects it actually removed
        let removed: Vec<serde_json::Value> = response.json().await?;
        if removed.is_empty() {
            return Err(AppError::NotFound(format!("Object not found: {}", path)));
        }

        tracing::debug!("Removed {} from bucket {}", path, self.bucket);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.client.storage_url(&format!(
            "object/public/{}/{}",
            self.bucket,
            encode_object_path(path)
        ))
    }

    fn storage_type(&self) -> &'static str {
        "supabase"
    }
}
