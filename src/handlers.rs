use crate::chart::Viewport;
use crate::errors::AppError;
use crate::models::{Dataset, SceneDescriptor, SceneResponse, SummaryResponse};
use crate::scenes;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct ViewportQuery {
    width: Option<f64>,
    height: Option<f64>,
}

impl ViewportQuery {
    fn viewport(&self) -> Viewport {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Viewport::clamped(width, height),
            _ => Viewport::default(),
        }
    }
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.dataset.is_some(), &state.source))
}

pub async fn list_scenes() -> Json<Vec<SceneDescriptor>> {
    Json(scenes::descriptors())
}

pub async fn get_scene(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ViewportQuery>,
) -> Result<Json<SceneResponse>, AppError> {
    let dataset = require_dataset(&state)?;
    let scene = scenes::find(&id)
        .ok_or_else(|| AppError::not_found(format!("unknown scene '{id}'")))?;

    let svg = scenes::render(scene, &dataset, query.viewport());
    Ok(Json(SceneResponse {
        id: scene.id,
        title: scene.title,
        subtitle: scene.subtitle,
        svg,
    }))
}

pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, AppError> {
    let dataset = require_dataset(&state)?;
    Ok(Json(scenes::summary(&dataset)))
}

/// Guarded no-op contract: without a loaded dataset, report a diagnostic and
/// skip rendering rather than fault.
fn require_dataset(state: &AppState) -> Result<Arc<Dataset>, AppError> {
    match &state.dataset {
        Some(dataset) => Ok(Arc::clone(dataset)),
        None => {
            warn!("scene requested before dataset load from {}", state.source);
            Err(AppError::unavailable(format!(
                "dataset not loaded from {}; rendering skipped",
                state.source
            )))
        }
    }
}
