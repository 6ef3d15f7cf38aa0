use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, mindmaps, projects, voting};
use crate::store::FileStore;

#[derive(Clone)]
pub struct AppState {
    pub store: FileStore,
}

pub fn create_router(store: FileStore) -> Router {
    let state = AppState { store };

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let project_routes = Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/:project_id", put(projects::rename).delete(projects::remove))
        .route("/:project_id/mindmaps", get(mindmaps::list))
        .route(
            "/:project_id/mindmaps/:mindmap_id",
            get(mindmaps::load).post(mindmaps::save).delete(mindmaps::remove),
        )
        .route("/:project_id/onVoting.json", get(voting::load).post(voting::save));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/projects", project_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
