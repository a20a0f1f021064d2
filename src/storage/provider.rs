use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::models::{NewPhoto, PhotoRecord};

/// Blob storage collaborator
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write data at `path`. Existing objects are never overwritten.
    async fn put(&self, path: &str, data: Bytes) -> Result<()>;

    /// Remove the object at `path`.
    /// Returns `AppError::NotFound` when nothing was stored there.
    async fn remove(&self, path: &str) -> Result<()>;

    /// Public URL for `path`; pure, no round trip
    fn public_url(&self, path: &str) -> String;

    /// Get the storage type name
    fn storage_type(&self) -> &'static str;
}

/// Metadata record collaborator
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a record; the store assigns `id` and `uploaded_at`
    async fn insert(&self, photo: &NewPhoto) -> Result<PhotoRecord>;

    /// All records, newest `uploaded_at` first
    async fn list(&self) -> Result<Vec<PhotoRecord>>;

    /// Returns `AppError::NotFound` for an unknown id
    async fn get(&self, id: &str) -> Result<PhotoRecord>;

    /// Returns `AppError::NotFound` for an unknown id
    async fn delete(&self, id: &str) -> Result<()>;
}
