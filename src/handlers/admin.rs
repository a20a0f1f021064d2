use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};

use crate::error::{ApiResponse, Result};
use crate::models::{GalleryQuery, GalleryResponse, Inconsistency, ReconcileReport};
use crate::AppState;

/// List all photos, newest first
/// GET /api/v1/admin/photos?refresh=true
pub async fn list_photos(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<ApiResponse<GalleryResponse>>> {
    let photos = state.photos.gallery(query.refresh).await?;
    Ok(Json(ApiResponse::success(GalleryResponse {
        total: photos.len(),
        photos: photos.as_ref().clone(),
    })))
}

/// Redirect to the photo's public URL
/// GET /api/v1/admin/photos/:id/download
pub async fn download_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let photo = state.photos.get_photo(&id).await?;
    Ok(Redirect::temporary(&state.photos.public_url(&photo.file_path)))
}

/// Delete a photo and its record
/// DELETE /api/v1/admin/photos/:id
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.photos.delete_by_id(&id).await?;
    Ok(Json(ApiResponse::<()>::success_message("Photo deleted")))
}

/// Blob/record mismatches awaiting reconcile
/// GET /api/v1/admin/inconsistencies
pub async fn list_inconsistencies(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<Inconsistency>>> {
    Json(ApiResponse::success(state.photos.inconsistencies()))
}

/// Apply compensating actions for every recorded mismatch
/// POST /api/v1/admin/reconcile
pub async fn reconcile(State(state): State<AppState>) -> Json<ApiResponse<ReconcileReport>> {
    let report = state.photos.reconcile().await;
    Json(ApiResponse::success(report))
}
