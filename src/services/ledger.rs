use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::{Inconsistency, InconsistencyKind};

/// In-process record of blob/record mismatches awaiting reconcile
#[derive(Default)]
pub struct ConsistencyLedger {
    entries: Mutex<Vec<Inconsistency>>,
}

impl ConsistencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; an existing entry of the same kind only gets its reason refreshed
    pub fn record(&self, kind: InconsistencyKind, reason: impl Into<String>) -> Inconsistency {
        let reason = reason.into();
        let mut entries = self.entries.lock();

        if let Some(existing) = entries.iter_mut().find(|e| e.kind == kind) {
            existing.reason = reason;
            return existing.clone();
        }

        let entry = Inconsistency {
            id: Uuid::new_v4().to_string(),
            kind,
            reason,
            detected_at: Utc::now(),
        };
        tracing::warn!(
            "Consistency ledger entry {}: {:?} ({})",
            entry.id,
            entry.kind,
            entry.reason
        );
        entries.push(entry.clone());
        entry
    }

    pub fn list(&self) -> Vec<Inconsistency> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn resolve(&self, id: &str) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    pub fn update_reason(&self, id: &str, reason: impl Into<String>) {
        if let Some(entry) = self.entries.lock().iter_mut().find(|e| e.id == id) {
            entry.reason = reason.into();
        }
    }
}
