use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{ApiResponse, AppError, Result};
use crate::models::{PhotoRecord, UploadFile};
use crate::AppState;

/// Upload a guest photo
/// POST /api/v1/photos (multipart field `file`)
pub async fn upload_photo(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<PhotoRecord>>> {
    let mut upload: Option<UploadFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to process multipart: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        if upload.is_some() {
            return Err(AppError::BadRequest(
                "Only one photo can be uploaded at a time".to_string(),
            ));
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|s| s.to_string());
        let bytes = field.bytes().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read file: {}", e))
        })?;

        upload = Some(UploadFile {
            name,
            content_type,
            bytes,
        });
    }

    let record = state.photos.upload(upload).await?;
    Ok(Json(ApiResponse::success_with_message(
        record,
        "Your photo was uploaded, thank you!",
    )))
}
