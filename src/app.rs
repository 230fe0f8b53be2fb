use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/scenes", get(handlers::list_scenes))
        .route("/api/scene/:id", get(handlers::get_scene))
        .route("/api/summary", get(handlers::get_summary))
        .with_state(state)
}
