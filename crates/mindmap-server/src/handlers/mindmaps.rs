use axum::{
    extract::{Path, State},
    Json,
};
use mindmap_shared::api::SaveResponse;
use mindmap_shared::{MindmapDocument, MindmapSummary};

use crate::error::AppError;
use crate::routes::AppState;

/// GET /api/projects/:projectId/mindmaps
pub async fn list(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<MindmapSummary>>, AppError> {
    Ok(Json(state.store.list_mindmaps(&project_id)?))
}

/// GET /api/projects/:projectId/mindmaps/:id
pub async fn load(
    State(state): State<AppState>,
    Path((project_id, mindmap_id)): Path<(String, String)>,
) -> Result<Json<MindmapDocument>, AppError> {
    Ok(Json(state.store.load_mindmap(&project_id, &mindmap_id)?))
}

/// POST /api/projects/:projectId/mindmaps/:id
///
/// Unconditional full-document overwrite; the server stamps `updatedAt`.
pub async fn save(
    State(state): State<AppState>,
    Path((project_id, mindmap_id)): Path<(String, String)>,
    Json(doc): Json<MindmapDocument>,
) -> Result<Json<SaveResponse>, AppError> {
    state.store.save_mindmap(&project_id, &mindmap_id, doc)?;
    Ok(Json(SaveResponse { success: true }))
}

/// DELETE /api/projects/:projectId/mindmaps/:id
pub async fn remove(
    State(state): State<AppState>,
    Path((project_id, mindmap_id)): Path<(String, String)>,
) -> Result<Json<SaveResponse>, AppError> {
    state.store.delete_mindmap(&project_id, &mindmap_id)?;
    Ok(Json(SaveResponse { success: true }))
}
