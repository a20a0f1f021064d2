use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Photo metadata record
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PhotoRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub uploaded_at: DateTime<Utc>,
}

/// Insert payload; `id` and `uploaded_at` are assigned by the record store
#[derive(Debug, Clone, Serialize)]
pub struct NewPhoto {
    pub file_name: String,
    pub file_path: String,
}

/// A file received from a guest
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Listing entry with its retrievable URL
#[derive(Debug, Clone, Serialize)]
pub struct PhotoView {
    pub id: String,
    pub file_name: String,
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
    pub url: String,
}

impl PhotoView {
    pub fn new(record: PhotoRecord, url: String) -> Self {
        Self {
            id: record.id,
            file_name: record.file_name,
            file_path: record.file_path,
            uploaded_at: record.uploaded_at,
            url,
        }
    }
}

/// Gallery response
#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub total: usize,
    pub photos: Vec<PhotoView>,
}

/// Gallery query parameters
#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// Record stores hand out either UUID strings or integer identities.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// `timestamptz` values carry an offset; plain `timestamp` values are read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(at.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid uploaded_at {:?}: {}", raw, e)))
}
