use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::PhotoView;

/// Snapshot of the gallery listing.
///
/// The store stays authoritative: any mutation that changed remote state
/// drops the snapshot, and a snapshot older than the TTL is ignored. The
/// generation counter stops a listing that started before a mutation from
/// repopulating the cache after it.
pub struct GalleryCache {
    ttl: Duration,
    inner: RwLock<CacheState>,
}

#[derive(Default)]
struct CacheState {
    generation: u64,
    snapshot: Option<(Instant, Arc<Vec<PhotoView>>)>,
}

impl GalleryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(CacheState::default()),
        }
    }

    /// Fresh snapshot, if any
    pub fn get(&self) -> Option<Arc<Vec<PhotoView>>> {
        let state = self.inner.read();
        match &state.snapshot {
            Some((at, photos)) if at.elapsed() < self.ttl => Some(photos.clone()),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Store a listing fetched while `generation` was current
    pub fn store(&self, generation: u64, photos: Vec<PhotoView>) -> Arc<Vec<PhotoView>> {
        let photos = Arc::new(photos);
        let mut state = self.inner.write();
        if state.generation == generation {
            state.snapshot = Some((Instant::now(), photos.clone()));
        }
        photos
    }

    pub fn invalidate(&self) {
        let mut state = self.inner.write();
        state.generation += 1;
        state.snapshot = None;
    }
}
