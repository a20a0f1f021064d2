use axum::{extract::State, Extension, Json};

use crate::error::{ApiResponse, Result};
use crate::models::{AdminSession, LoginRequest, LoginResponse};
use crate::AppState;

/// Start an admin session
/// POST /api/v1/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    let response = state.auth.login(&req)?;
    Ok(Json(ApiResponse::success(response)))
}

/// End all admin sessions
/// POST /api/v1/admin/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Result<Json<ApiResponse<()>>> {
    tracing::debug!("Logout requested by session {}", session.session_id);
    state.auth.logout()?;
    Ok(Json(ApiResponse::<()>::success_message("Logged out")))
}
