//! Route registration

use super::{dto::*, error::Problem, handlers};
use crate::domain::Service;
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;

/// Build the banner router with the service attached as an extension
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        // Settings endpoints
        .route(
            handlers::SETTINGS_PATH,
            get(get_settings_handler).put(replace_settings_handler),
        )
        // Render endpoints
        .route(handlers::RENDER_PATH, post(render_preview_handler))
        // Add service as extension for handlers
        .layer(Extension(service))
}

// ===== Handler wrappers that extract service from Extension =====

async fn get_settings_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<SettingsDto>, Problem> {
    handlers::get_settings(service).await
}

async fn replace_settings_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<serde_json::Value>,
) -> Result<Json<SettingsDto>, Problem> {
    handlers::replace_settings(service, json).await
}

async fn render_preview_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<RenderRequest>,
) -> Result<Json<RenderResponse>, Problem> {
    handlers::render_preview(service, json).await
}
