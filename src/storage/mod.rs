pub mod local;
pub mod provider;
pub mod sqlite;
pub mod supabase;

pub use local::*;
pub use provider::*;
pub use sqlite::*;
pub use supabase::{SupabaseRecords, SupabaseStorage};

use std::sync::Arc;
use std::time::Duration;

use crate::config::{BackendKind, Config};
use crate::db::Database;
use crate::error::Result;

/// The collaborator pair the photo workflows run against
#[derive(Clone)]
pub struct Stores {
    pub objects: Arc<dyn ObjectStore>,
    pub records: Arc<dyn RecordStore>,
}

/// Builds the configured backend
pub struct StorageManager;

impl StorageManager {
    pub async fn connect(config: &Config) -> Result<Stores> {
        match config.backend.kind {
            BackendKind::Supabase => {
                let client = supabase::Client::new(
                    &config.supabase.url,
                    &config.supabase.api_key,
                    Duration::from_secs(config.supabase.timeout_secs),
                )?;
                tracing::info!("Using Supabase backend at {}", client.base_url());
                Ok(Stores {
                    objects: Arc::new(SupabaseStorage::new(
                        client.clone(),
                        &config.supabase.bucket,
                    )),
                    records: Arc::new(SupabaseRecords::new(client, &config.supabase.table)),
                })
            }
            BackendKind::Local => {
                let db = Database::new(&config.local.database_path).await?;
                db.run_migrations().await?;
                tracing::info!(
                    "Using local backend: blobs in {}, records in {}",
                    config.local.storage_path,
                    config.local.database_path
                );
                Ok(Stores {
                    objects: Arc::new(LocalStorage::new(
                        &config.local.storage_path,
                        &config.local.public_base_url,
                    )),
                    records: Arc::new(SqliteRecords::new(db)),
                })
            }
        }
    }
}
