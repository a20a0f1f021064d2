use chrono::{DateTime, Utc};
use serde::Serialize;

/// A state where blob and record no longer agree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InconsistencyKind {
    /// Blob written, record insert failed, compensating remove failed
    OrphanedBlob { file_path: String },
    /// Record references a blob that is gone
    DanglingRecord { record_id: String, file_path: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Inconsistency {
    pub id: String,
    #[serde(flatten)]
    pub kind: InconsistencyKind,
    pub reason: String,
    pub detected_at: DateTime<Utc>,
}

/// Outcome of a reconcile pass
#[derive(Debug, Serialize)]
pub struct ReconcileReport {
    pub resolved: usize,
    pub remaining: Vec<Inconsistency>,
}
