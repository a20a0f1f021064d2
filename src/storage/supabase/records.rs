use async_trait::async_trait;
use reqwest::Method;

use super::client::Client;
use crate::error::{AppError, Result};
use crate::models::{NewPhoto, PhotoRecord};
use crate::storage::RecordStore;

/// PostgREST table holding photo records
pub struct SupabaseRecords {
    client: Client,
    table: String,
}

impl SupabaseRecords {
    pub fn new(client: Client, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }

    fn url(&self) -> String {
        self.client.rest_url(&self.table)
    }
}

#[async_trait]
impl RecordStore for SupabaseRecords {
    async fn insert(&self, photo: &NewPhoto) -> Result<PhotoRecord> {
        let response = self
            .client
            .request(Method::POST, &self.url())
            .header("Prefer", "return=representation")
            .json(&[photo])
            .send()
            .await?;
        let response = Client::check(response, "Record insert").await?;

        let mut rows: Vec<PhotoRecord> = response.json().await?;
        if rows.is_empty() {
            return Err(AppError::Storage(
                "Record insert returned no rows".to_string(),
            ));
        }
        Ok(rows.swap_remove(0))
    }

    async fn list(&self) -> Result<Vec<PhotoRecord>> {
        let response = self
            .client
            .request(Method::GET, &self.url())
            .query(&[("select", "*"), ("order", "uploaded_at.desc")])
            .send()
            .await?;
        let response = Client::check(response, "Record list").await?;

        Ok(response.json().await?)
    }

    async fn get(&self, id: &str) -> Result<PhotoRecord> {
        let filter = format!("eq.{}", id);
        let response = self
            .client
            .request(Method::GET, &self.url())
            .query(&[("select", "*"), ("id", filter.as_str())])
            .send()
            .await?;
        let response = Client::check(response, "Record fetch").await?;

        let rows: Vec<PhotoRecord> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("Photo not found: {}", id)))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let filter = format!("eq.{}", id);
        let response = self
            .client
            .request(Method::DELETE, &self.url())
            .header("Prefer", "return=representation")
            .query(&[("id", filter.as_str())])
            .send()
            .await?;
        let response = Client::check(response, "Record delete").await?;

        let rows: Vec<serde_json::Value> = response.json().await?;
        if rows.is_empty() {
            return Err(AppError::NotFound(format!("Photo not found: {}", id)));
        }
        Ok(())
    }
}
