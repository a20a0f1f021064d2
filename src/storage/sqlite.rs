use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{NewPhoto, PhotoRecord};
use crate::storage::RecordStore;

/// `photos` table in the local SQLite database
pub struct SqliteRecords {
    db: Database,
}

impl SqliteRecords {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for SqliteRecords {
    async fn insert(&self, photo: &NewPhoto) -> Result<PhotoRecord> {
        let id = Uuid::new_v4().to_string();
        // Fixed-width timestamps keep text ordering chronological
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        sqlx::query(
            r#"
            INSERT INTO photos (id, file_name, file_path, uploaded_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&photo.file_name)
        .bind(&photo.file_path)
        .bind(&now)
        .execute(self.db.pool())
        .await?;

        self.get(&id).await
    }

    async fn list(&self) -> Result<Vec<PhotoRecord>> {
        let photos: Vec<PhotoRecord> = sqlx::query_as(
            "SELECT id, file_name, file_path, uploaded_at FROM photos ORDER BY uploaded_at DESC, rowid DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(photos)
    }

    async fn get(&self, id: &str) -> Result<PhotoRecord> {
        let photo: PhotoRecord = sqlx::query_as(
            "SELECT id, file_name, file_path, uploaded_at FROM photos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Photo not found: {}", id)))?;

        Ok(photo)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM photos WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Photo not found: {}", id)));
        }
        Ok(())
    }
}
