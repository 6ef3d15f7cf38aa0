use axum::{
    extract::{Path, State},
    Json,
};
use mindmap_shared::api::SaveResponse;
use mindmap_shared::VotingDocument;

use crate::error::AppError;
use crate::routes::AppState;

/// GET /api/projects/:projectId/onVoting.json
pub async fn load(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<VotingDocument>, AppError> {
    Ok(Json(state.store.load_voting(&project_id)?))
}

/// POST /api/projects/:projectId/onVoting.json
pub async fn save(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(doc): Json<VotingDocument>,
) -> Result<Json<SaveResponse>, AppError> {
    state.store.save_voting(&project_id, &doc)?;
    Ok(Json(SaveResponse { success: true }))
}
