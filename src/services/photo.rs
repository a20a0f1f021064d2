use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, DeleteError, ListError, Result, UploadError};
use crate::models::{
    Inconsistency, InconsistencyKind, NewPhoto, PhotoRecord, PhotoView, ReconcileReport,
    UploadFile,
};
use crate::services::{ConsistencyLedger, GalleryCache};
use crate::storage::{ObjectStore, RecordStore, Stores};

/// Prefix of every generated storage path
pub const UPLOAD_DIR: &str = "uploads";

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 12;

/// Photo upload, gallery and delete workflows
pub struct PhotoService {
    objects: Arc<dyn ObjectStore>,
    records: Arc<dyn RecordStore>,
    ledger: ConsistencyLedger,
    cache: GalleryCache,
}

impl PhotoService {
    pub fn new(stores: Stores, cache_ttl: Duration) -> Self {
        Self {
            objects: stores.objects,
            records: stores.records,
            ledger: ConsistencyLedger::new(),
            cache: GalleryCache::new(cache_ttl),
        }
    }

    /// Store a guest's photo: blob first, then its record.
    ///
    /// If the record insert fails the blob is removed again; when that
    /// removal fails too the blob is entered in the ledger as orphaned.
    pub async fn upload(&self, file: Option<UploadFile>) -> std::result::Result<PhotoRecord, UploadError> {
        let file = match file {
            Some(f) if !f.name.trim().is_empty() && !f.bytes.is_empty() => f,
            _ => return Err(UploadError::NoFile),
        };

        if !is_image(&file) {
            tracing::info!(
                "Rejected upload {:?} with content type {:?}",
                file.name,
                file.content_type
            );
            return Err(UploadError::UnsupportedType);
        }

        let file_path = generate_storage_path(&file.name, file.content_type.as_deref());
        let size = file.bytes.len();

        if let Err(e) = self.objects.put(&file_path, file.bytes).await {
            tracing::error!(
                "Upload failed at storage_write: path={} name={:?}: {}",
                file_path,
                file.name,
                e
            );
            return Err(UploadError::StorageWrite {
                file_path,
                reason: e.to_string(),
            });
        }

        let new_photo = NewPhoto {
            file_name: file.name,
            file_path: file_path.clone(),
        };

        let record = match self.records.insert(&new_photo).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(
                    "Upload failed at metadata_write: path={} name={:?}: {}",
                    file_path,
                    new_photo.file_name,
                    e
                );
                let compensated = self.remove_orphan(&file_path, &e.to_string()).await;
                return Err(UploadError::MetadataWrite {
                    file_path,
                    compensated,
                    reason: e.to_string(),
                });
            }
        };

        self.cache.invalidate();
        tracing::info!(
            "Stored photo {} as {} ({} bytes)",
            record.id,
            record.file_path,
            size
        );
        Ok(record)
    }

    /// Compensate a failed insert. Returns whether the blob is gone.
    async fn remove_orphan(&self, file_path: &str, cause: &str) -> bool {
        match self.objects.remove(file_path).await {
            Ok(()) => {
                tracing::info!("Removed orphaned blob {}", file_path);
                true
            }
            Err(e) if e.is_not_found() => true,
            Err(e) => {
                tracing::error!(
                    "Compensating remove failed, blob {} is orphaned: {}",
                    file_path,
                    e
                );
                self.ledger.record(
                    InconsistencyKind::OrphanedBlob {
                        file_path: file_path.to_string(),
                    },
                    format!("record insert failed ({}); blob remove failed ({})", cause, e),
                );
                false
            }
        }
    }

    /// All photos, newest first, with their public URLs
    pub async fn list_photos(&self) -> std::result::Result<Vec<PhotoView>, ListError> {
        let records = self.records.list().await.map_err(|e| {
            tracing::error!("Listing photos failed: {}", e);
            ListError::ListFetch {
                reason: e.to_string(),
            }
        })?;

        Ok(records
            .into_iter()
            .map(|record| {
                let url = self.objects.public_url(&record.file_path);
                PhotoView::new(record, url)
            })
            .collect())
    }

    /// Listing served through the gallery cache
    pub async fn gallery(&self, refresh: bool) -> std::result::Result<Arc<Vec<PhotoView>>, ListError> {
        if !refresh {
            if let Some(photos) = self.cache.get() {
                return Ok(photos);
            }
        }

        let generation = self.cache.generation();
        let photos = self.list_photos().await?;
        Ok(self.cache.store(generation, photos))
    }

    pub async fn get_photo(&self, id: &str) -> Result<PhotoRecord> {
        self.records.get(id).await
    }

    pub fn public_url(&self, file_path: &str) -> String {
        self.objects.public_url(file_path)
    }

    pub fn storage_type(&self) -> &'static str {
        self.objects.storage_type()
    }

    /// Remove a photo: blob first, then its record.
    ///
    /// Deletion is strict: a blob that is already missing fails the
    /// workflow and leaves the record, which is entered in the ledger
    /// as dangling.
    pub async fn delete(&self, record: &PhotoRecord) -> std::result::Result<(), DeleteError> {
        if let Err(e) = self.objects.remove(&record.file_path).await {
            let missing = e.is_not_found();
            tracing::error!(
                "Delete failed at storage_remove: record={} path={} missing={}: {}",
                record.id,
                record.file_path,
                missing,
                e
            );
            if missing {
                self.ledger.record(
                    InconsistencyKind::DanglingRecord {
                        record_id: record.id.clone(),
                        file_path: record.file_path.clone(),
                    },
                    format!("blob missing on delete ({})", e),
                );
            }
            return Err(DeleteError::StorageRemove {
                record_id: record.id.clone(),
                file_path: record.file_path.clone(),
                missing,
                reason: e.to_string(),
            });
        }

        // The blob is gone from here on, so the listing is stale either way.
        // A listing taken while the record delete runs may still cache the
        // record, so invalidate again once that step settles.
        self.cache.invalidate();
        let outcome = self.records.delete(&record.id).await;
        self.cache.invalidate();

        match outcome {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    "Record {} was already deleted when removing {}",
                    record.id,
                    record.file_path
                );
            }
            Err(e) => {
                tracing::error!(
                    "Delete failed at metadata_delete, record {} now dangles (path={}): {}",
                    record.id,
                    record.file_path,
                    e
                );
                self.ledger.record(
                    InconsistencyKind::DanglingRecord {
                        record_id: record.id.clone(),
                        file_path: record.file_path.clone(),
                    },
                    format!("record delete failed after blob removal ({})", e),
                );
                return Err(DeleteError::MetadataDelete {
                    record_id: record.id.clone(),
                    file_path: record.file_path.clone(),
                    reason: e.to_string(),
                });
            }
        }

        tracing::info!("Deleted photo {} ({})", record.id, record.file_path);
        Ok(())
    }

    /// Look up a record by id, then run the delete workflow on it
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        let record = self.records.get(id).await?;
        self.delete(&record).await.map_err(AppError::from)
    }

    pub fn inconsistencies(&self) -> Vec<Inconsistency> {
        self.ledger.list()
    }

    /// Apply the compensating action for every ledger entry
    pub async fn reconcile(&self) -> ReconcileReport {
        let mut resolved = 0;

        for entry in self.ledger.list() {
            let outcome = match &entry.kind {
                InconsistencyKind::OrphanedBlob { file_path } => {
                    self.objects.remove(file_path).await
                }
                InconsistencyKind::DanglingRecord { record_id, .. } => {
                    self.records.delete(record_id).await
                }
            };

            match outcome {
                Ok(()) => {
                    tracing::info!("Reconciled {:?}", entry.kind);
                    self.ledger.resolve(&entry.id);
                    resolved += 1;
                }
                Err(e) if e.is_not_found() => {
                    tracing::info!("Reconciled {:?} (already gone)", entry.kind);
                    self.ledger.resolve(&entry.id);
                    resolved += 1;
                }
                Err(e) => {
                    tracing::warn!("Reconcile of {:?} failed: {}", entry.kind, e);
                    self.ledger
                        .update_reason(&entry.id, format!("reconcile failed ({})", e));
                }
            }
        }

        if resolved > 0 {
            self.cache.invalidate();
        }

        ReconcileReport {
            resolved,
            remaining: self.ledger.list(),
        }
    }
}

/// `uploads/<unix-millis>-<random suffix>.<ext>`
pub fn generate_storage_path(file_name: &str, content_type: Option<&str>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();

    format!(
        "{}/{}-{}.{}",
        UPLOAD_DIR,
        Utc::now().timestamp_millis(),
        suffix,
        storage_extension(file_name, content_type)
    )
}

/// Extension taken from the original name, else from the content type, else `bin`
pub fn storage_extension(file_name: &str, content_type: Option<&str>) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            ext.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|ext| !ext.is_empty())
        .or_else(|| {
            content_type
                .and_then(mime_guess::get_mime_extensions_str)
                .and_then(|exts| exts.first())
                .map(|ext| ext.to_string())
        })
        .unwrap_or_else(|| "bin".to_string())
}

fn is_image(file: &UploadFile) -> bool {
    let declared = file
        .content_type
        .as_deref()
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false);

    declared
        || mime_guess::from_path(&file.name)
            .first()
            .map(|m| m.type_() == mime_guess::mime::IMAGE)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct MemoryObjects {
        blobs: Mutex<HashMap<String, Bytes>>,
        fail_put: AtomicBool,
        fail_remove: AtomicBool,
    }

    #[async_trait]
    impl ObjectStore for MemoryObjects {
        async fn put(&self, path: &str, data: Bytes) -> Result<()> {
            if self.fail_put.load(Ordering::SeqCst) {
                return Err(AppError::Storage("put refused".to_string()));
            }
            self.blobs.lock().insert(path.to_string(), data);
            Ok(())
        }

        async fn remove(&self, path: &str) -> Result<()> {
            if self.fail_remove.load(Ordering::SeqCst) {
                return Err(AppError::Storage("remove refused".to_string()));
            }
            match self.blobs.lock().remove(path) {
                Some(_) => Ok(()),
                None => Err(AppError::NotFound(path.to_string())),
            }
        }

        fn public_url(&self, path: &str) -> String {
            format!("https://cdn.test/{}", path)
        }

        fn storage_type(&self) -> &'static str {
            "memory"
        }
    }

    #[derive(Default)]
    struct MemoryRecords {
        rows: Mutex<Vec<PhotoRecord>>,
        next_id: AtomicU64,
        fail_insert: AtomicBool,
        fail_list: AtomicBool,
        fail_delete: AtomicBool,
        /// (started, release): delete signals `started`, then waits for `release`
        delete_gate: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
    }

    #[async_trait]
    impl RecordStore for MemoryRecords {
        async fn insert(&self, photo: &NewPhoto) -> Result<PhotoRecord> {
            if self.fail_insert.load(Ordering::SeqCst) {
                return Err(AppError::Storage("insert refused".to_string()));
            }
            let n = self.next_id.fetch_add(1, Ordering::SeqCst);
            let record = PhotoRecord {
                id: format!("r{}", n),
                file_name: photo.file_name.clone(),
                file_path: photo.file_path.clone(),
                uploaded_at: Utc::now() + chrono::Duration::milliseconds(n as i64),
            };
            self.rows.lock().push(record.clone());
            Ok(record)
        }

        async fn list(&self) -> Result<Vec<PhotoRecord>> {
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(AppError::Storage("list refused".to_string()));
            }
            let mut rows = self.rows.lock().clone();
            rows.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
            Ok(rows)
        }

        async fn get(&self, id: &str) -> Result<PhotoRecord> {
            self.rows
                .lock()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(id.to_string()))
        }

        async fn delete(&self, id: &str) -> Result<()> {
            let gate = self.delete_gate.lock().clone();
            if let Some((started, release)) = gate {
                started.notify_one();
                release.notified().await;
            }
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(AppError::Storage("delete refused".to_string()));
            }
            let mut rows = self.rows.lock();
            let before = rows.len();
            rows.retain(|r| r.id != id);
            if rows.len() == before {
                return Err(AppError::NotFound(id.to_string()));
            }
            Ok(())
        }
    }

    struct Harness {
        objects: Arc<MemoryObjects>,
        records: Arc<MemoryRecords>,
        service: PhotoService,
    }

    fn harness() -> Harness {
        let objects = Arc::new(MemoryObjects::default());
        let records = Arc::new(MemoryRecords::default());
        let service = PhotoService::new(
            Stores {
                objects: objects.clone(),
                records: records.clone(),
            },
            Duration::from_secs(60),
        );
        Harness {
            objects,
            records,
            service,
        }
    }

    fn jpeg(name: &str) -> Option<UploadFile> {
        Some(UploadFile {
            name: name.to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: Bytes::from_static(b"\xff\xd8\xff"),
        })
    }

    /// `uploads/\d+-[a-z0-9]+\.<ext>`
    fn matches_path_pattern(path: &str, ext: &str) -> bool {
        let Some(rest) = path.strip_prefix("uploads/") else {
            return false;
        };
        let Some(stem) = rest.strip_suffix(&format!(".{}", ext)) else {
            return false;
        };
        let Some((millis, suffix)) = stem.split_once('-') else {
            return false;
        };
        !millis.is_empty()
            && millis.chars().all(|c| c.is_ascii_digit())
            && !suffix.is_empty()
            && suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    }

    #[tokio::test]
    async fn test_upload_cat_scenario() {
        let h = harness();

        let record = h.service.upload(jpeg("cat.jpg")).await.unwrap();

        assert_eq!(record.file_name, "cat.jpg");
        assert!(matches_path_pattern(&record.file_path, "jpg"), "{}", record.file_path);
        let blobs = h.objects.blobs.lock();
        assert_eq!(blobs.get(&record.file_path).unwrap().len(), 3);
        assert_eq!(h.records.rows.lock()[0].file_path, record.file_path);
    }

    #[tokio::test]
    async fn test_upload_without_file() {
        let h = harness();

        assert!(matches!(h.service.upload(None).await, Err(UploadError::NoFile)));

        let empty = Some(UploadFile {
            name: "empty.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: Bytes::new(),
        });
        assert!(matches!(h.service.upload(empty).await, Err(UploadError::NoFile)));
        assert!(h.objects.blobs.lock().is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_non_images() {
        let h = harness();
        let pdf = Some(UploadFile {
            name: "invite.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from_static(b"%PDF"),
        });

        assert!(matches!(
            h.service.upload(pdf).await,
            Err(UploadError::UnsupportedType)
        ));
    }

    #[tokio::test]
    async fn test_upload_accepts_image_by_name() {
        let h = harness();
        let untyped = Some(UploadFile {
            name: "IMG_0001.JPG".to_string(),
            content_type: Some("application/octet-stream".to_string()),
            bytes: Bytes::from_static(b"jpg"),
        });
        let png = Some(UploadFile {
            name: "flowers.png".to_string(),
            content_type: None,
            bytes: Bytes::from_static(b"png"),
        });

        assert!(h.service.upload(untyped).await.is_ok());
        let record = h.service.upload(png).await.unwrap();
        assert!(record.file_path.ends_with(".png"));
        assert_eq!(h.records.rows.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_storage_write_failure_creates_nothing() {
        let h = harness();
        h.objects.fail_put.store(true, Ordering::SeqCst);

        let err = h.service.upload(jpeg("cat.jpg")).await.unwrap_err();

        assert!(matches!(err, UploadError::StorageWrite { .. }));
        assert!(h.records.rows.lock().is_empty());
        assert!(h.service.inconsistencies().is_empty());
    }

    #[tokio::test]
    async fn test_metadata_write_failure_compensates() {
        let h = harness();
        h.records.fail_insert.store(true, Ordering::SeqCst);

        let err = h.service.upload(jpeg("cat.jpg")).await.unwrap_err();

        match err {
            UploadError::MetadataWrite { compensated, .. } => assert!(compensated),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(h.objects.blobs.lock().is_empty());
        assert!(h.service.inconsistencies().is_empty());
    }

    #[tokio::test]
    async fn test_failed_compensation_leaves_orphan_in_ledger() {
        let h = harness();
        h.records.fail_insert.store(true, Ordering::SeqCst);
        h.objects.fail_remove.store(true, Ordering::SeqCst);

        let err = h.service.upload(jpeg("cat.jpg")).await.unwrap_err();
        let file_path = match err {
            UploadError::MetadataWrite {
                file_path,
                compensated,
                ..
            } => {
                assert!(!compensated);
                file_path
            }
            other => panic!("unexpected error: {:?}", other),
        };

        let ledger = h.service.inconsistencies();
        assert_eq!(ledger.len(), 1);
        assert_eq!(
            ledger[0].kind,
            InconsistencyKind::OrphanedBlob {
                file_path: file_path.clone()
            }
        );
        assert!(h.objects.blobs.lock().contains_key(&file_path));

        h.objects.fail_remove.store(false, Ordering::SeqCst);
        let report = h.service.reconcile().await;
        assert_eq!(report.resolved, 1);
        assert!(report.remaining.is_empty());
        assert!(h.objects.blobs.lock().is_empty());
    }

    #[tokio::test]
    async fn test_list_empty() {
        let h = harness();
        assert!(h.service.list_photos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_newest_first_with_urls() {
        let h = harness();
        h.service.upload(jpeg("first.jpg")).await.unwrap();
        h.service.upload(jpeg("second.jpg")).await.unwrap();
        let newest = h.service.upload(jpeg("third.jpg")).await.unwrap();

        let photos = h.service.list_photos().await.unwrap();

        assert_eq!(photos.len(), 3);
        assert_eq!(photos[0].id, newest.id);
        assert!(photos
            .windows(2)
            .all(|w| w[0].uploaded_at > w[1].uploaded_at));
        assert_eq!(photos[0].url, format!("https://cdn.test/{}", newest.file_path));
    }

    #[tokio::test]
    async fn test_list_failure() {
        let h = harness();
        h.records.fail_list.store(true, Ordering::SeqCst);
        assert!(matches!(
            h.service.list_photos().await,
            Err(ListError::ListFetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_gallery_cache_invalidated_by_upload() {
        let h = harness();
        h.service.upload(jpeg("a.jpg")).await.unwrap();
        assert_eq!(h.service.gallery(false).await.unwrap().len(), 1);

        // Served from cache even though the store now fails
        h.records.fail_list.store(true, Ordering::SeqCst);
        assert_eq!(h.service.gallery(false).await.unwrap().len(), 1);
        h.records.fail_list.store(false, Ordering::SeqCst);

        h.service.upload(jpeg("b.jpg")).await.unwrap();
        let photos = h.service.gallery(false).await.unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].file_name, "b.jpg");
    }

    #[tokio::test]
    async fn test_delete_removes_blob_and_record() {
        let h = harness();
        let record = h.service.upload(jpeg("cat.jpg")).await.unwrap();

        h.service.delete(&record).await.unwrap();

        assert!(h.objects.blobs.lock().is_empty());
        assert!(h.service.list_photos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_during_record_delete_is_not_cached() {
        let h = harness();
        let record = h.service.upload(jpeg("cat.jpg")).await.unwrap();
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *h.records.delete_gate.lock() = Some((started.clone(), release.clone()));

        let listing = async {
            started.notified().await;
            let seen = h.service.gallery(false).await.unwrap().len();
            release.notify_one();
            seen
        };
        let (deleted, seen) = tokio::join!(h.service.delete(&record), listing);

        deleted.unwrap();
        assert_eq!(seen, 1);
        assert!(h.service.gallery(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_with_missing_blob_is_strict() {
        let h = harness();
        let record = h.service.upload(jpeg("cat.jpg")).await.unwrap();
        // Simulate a blob write that never completed
        h.objects.blobs.lock().clear();

        let err = h.service.delete(&record).await.unwrap_err();

        assert!(matches!(err, DeleteError::StorageRemove { missing: true, .. }));
        let photos = h.service.list_photos().await.unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].id, record.id);

        let ledger = h.service.inconsistencies();
        assert_eq!(ledger.len(), 1);
        assert!(matches!(
            &ledger[0].kind,
            InconsistencyKind::DanglingRecord { record_id, .. } if record_id == &record.id
        ));

        let report = h.service.reconcile().await;
        assert_eq!(report.resolved, 1);
        assert!(h.service.list_photos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_remove_failure_keeps_everything() {
        let h = harness();
        let record = h.service.upload(jpeg("cat.jpg")).await.unwrap();
        h.objects.fail_remove.store(true, Ordering::SeqCst);

        let err = h.service.delete(&record).await.unwrap_err();

        assert!(matches!(err, DeleteError::StorageRemove { missing: false, .. }));
        assert!(h.objects.blobs.lock().contains_key(&record.file_path));
        assert_eq!(h.records.rows.lock().len(), 1);
        assert!(h.service.inconsistencies().is_empty());
    }

    #[tokio::test]
    async fn test_metadata_delete_failure_flags_dangling_record() {
        let h = harness();
        let record = h.service.upload(jpeg("cat.jpg")).await.unwrap();
        h.records.fail_delete.store(true, Ordering::SeqCst);

        let err = h.service.delete(&record).await.unwrap_err();

        assert!(matches!(err, DeleteError::MetadataDelete { .. }));
        assert!(h.objects.blobs.lock().is_empty());
        assert_eq!(h.service.inconsistencies().len(), 1);

        // Reconcile keeps the entry while the store still refuses
        let report = h.service.reconcile().await;
        assert_eq!(report.resolved, 0);
        assert_eq!(report.remaining.len(), 1);

        h.records.fail_delete.store(false, Ordering::SeqCst);
        let report = h.service.reconcile().await;
        assert_eq!(report.resolved, 1);
        assert!(h.records.rows.lock().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_unknown_id() {
        let h = harness();
        let err = h.service.delete_by_id("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_storage_paths_are_unique() {
        let paths: HashSet<String> = (0..10_000)
            .map(|_| generate_storage_path("cat.jpg", None))
            .collect();
        assert_eq!(paths.len(), 10_000);
    }

    #[test]
    fn test_storage_path_shape() {
        let path = generate_storage_path("Holiday Pic.JPEG", Some("image/jpeg"));
        assert!(matches_path_pattern(&path, "jpeg"), "{}", path);
    }

    #[test]
    fn test_storage_extension() {
        assert_eq!(storage_extension("photo.JPG", None), "jpg");
        assert_eq!(storage_extension("archive.tar.gz", None), "gz");
        assert_eq!(storage_extension("weird.j p*g", None), "jpg");
        assert_eq!(storage_extension("no-extension", None), "bin");
        assert_eq!(storage_extension("trailing.", None), "bin");
        assert_ne!(storage_extension("no-extension", Some("image/png")), "bin");
    }
}
