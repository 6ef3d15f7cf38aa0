use axum::{
    extract::{Path, State},
    Json,
};
use mindmap_shared::api::{CreateProjectRequest, ProjectSummary, RenameProjectRequest, SaveResponse};

use crate::error::AppError;
use crate::routes::AppState;

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProjectSummary>>, AppError> {
    Ok(Json(state.store.list_projects()?))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<ProjectSummary>, AppError> {
    Ok(Json(state.store.create_project(&req.name)?))
}

/// PUT /api/projects/:id
pub async fn rename(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(req): Json<RenameProjectRequest>,
) -> Result<Json<ProjectSummary>, AppError> {
    Ok(Json(state.store.rename_project(&project_id, &req.name)?))
}

/// DELETE /api/projects/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<SaveResponse>, AppError> {
    state.store.delete_project(&project_id)?;
    Ok(Json(SaveResponse { success: true }))
}
