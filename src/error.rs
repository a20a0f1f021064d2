use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Upload workflow failures
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Please choose a photo to upload")]
    NoFile,

    #[error("Only image files can be uploaded")]
    UnsupportedType,

    #[error("The photo could not be stored, please try again")]
    StorageWrite { file_path: String, reason: String },

    /// The blob was written but the record insert failed. `compensated`
    /// tells whether the blob was removed again.
    #[error("The photo could not be saved, please try again")]
    MetadataWrite {
        file_path: String,
        compensated: bool,
        reason: String,
    },
}

/// Delete workflow failures
#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    /// Nothing changed: blob and record are both still in place,
    /// unless `missing` is set, in which case the blob was already gone.
    #[error("The photo could not be removed from storage")]
    StorageRemove {
        record_id: String,
        file_path: String,
        missing: bool,
        reason: String,
    },

    /// The blob is gone but its record is still listed.
    #[error("The photo file was removed but its entry could not be deleted")]
    MetadataDelete {
        record_id: String,
        file_path: String,
        reason: String,
    },
}

/// Gallery listing failures
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("Photos could not be loaded")]
    ListFetch { reason: String },
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Delete(#[from] DeleteError),

    #[error(transparent)]
    List(#[from] ListError),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

/// API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: &str) -> Self {
        Self {
            code: 0,
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn success_message(message: &str) -> ApiResponse<()> {
        ApiResponse {
            code: 0,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn error(code: i32, message: &str) -> ApiResponse<()> {
        ApiResponse {
            code,
            message: message.to_string(),
            data: None,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    pub fn error_with_data(code: i32, message: &str, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, data) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                return plain(StatusCode::INTERNAL_SERVER_ERROR, 500, "Database error");
            }
            AppError::NotFound(msg) => return plain(StatusCode::NOT_FOUND, 404, msg),
            AppError::Unauthorized(msg) => return plain(StatusCode::UNAUTHORIZED, 401, msg),
            AppError::BadRequest(msg) => return plain(StatusCode::BAD_REQUEST, 400, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                return plain(StatusCode::INTERNAL_SERVER_ERROR, 500, msg);
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                return plain(StatusCode::BAD_GATEWAY, 502, msg);
            }
            AppError::Jwt(e) => {
                tracing::warn!("JWT error: {:?}", e);
                return plain(StatusCode::UNAUTHORIZED, 401, "Invalid token");
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {:?}", e);
                return plain(StatusCode::INTERNAL_SERVER_ERROR, 500, "IO error");
            }
            AppError::Request(e) => {
                tracing::error!("Request error: {:?}", e);
                return plain(StatusCode::BAD_GATEWAY, 502, "External request error");
            }
            AppError::Upload(e) => match e {
                UploadError::NoFile => return plain(StatusCode::BAD_REQUEST, 4001, &message),
                UploadError::UnsupportedType => {
                    return plain(StatusCode::UNSUPPORTED_MEDIA_TYPE, 4002, &message)
                }
                UploadError::StorageWrite { file_path, .. } => (
                    StatusCode::BAD_GATEWAY,
                    5001,
                    json!({ "step": "storage_write", "file_path": file_path }),
                ),
                UploadError::MetadataWrite {
                    file_path,
                    compensated,
                    ..
                } => (
                    StatusCode::BAD_GATEWAY,
                    5002,
                    json!({
                        "step": "metadata_write",
                        "file_path": file_path,
                        "compensated": compensated,
                    }),
                ),
            },
            AppError::Delete(e) => match e {
                DeleteError::StorageRemove {
                    record_id,
                    file_path,
                    missing,
                    ..
                } => (
                    StatusCode::BAD_GATEWAY,
                    5003,
                    json!({
                        "step": "storage_remove",
                        "record_id": record_id,
                        "file_path": file_path,
                        "missing": missing,
                    }),
                ),
                DeleteError::MetadataDelete {
                    record_id,
                    file_path,
                    ..
                } => (
                    StatusCode::BAD_GATEWAY,
                    5004,
                    json!({
                        "step": "metadata_delete",
                        "record_id": record_id,
                        "file_path": file_path,
                        "partial": true,
                    }),
                ),
            },
            AppError::List(_) => (
                StatusCode::BAD_GATEWAY,
                5005,
                json!({ "step": "list_fetch" }),
            ),
        };

        let body = Json(ApiResponse::error_with_data(code, &message, data));
        (status, body).into_response()
    }
}

fn plain(status: StatusCode, code: i32, message: &str) -> Response {
    let body = Json(ApiResponse::<()>::error(code, message));
    (status, body).into_response()
}

pub type Result<T> = std::result::Result<T, AppError>;
