use axum::{extract::State, Json};
use mindmap_shared::api::{AuthResponse, LoginRequest, RegisterRequest};

use crate::error::AppError;
use crate::routes::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(state.store.register(&req.username, &req.password)?))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(state.store.login(&req.username, &req.password)?))
}
