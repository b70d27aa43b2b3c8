//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
    mapper,
};
use crate::domain::Service;
use axum::Json;
use std::sync::Arc;

pub const SETTINGS_PATH: &str = "/banner/v1/settings";
pub const RENDER_PATH: &str = "/banner/v1/render";

// ===== Settings Handlers =====

/// Get the current validated settings
pub async fn get_settings(service: Arc<Service>) -> Result<Json<SettingsDto>, Problem> {
    let settings = service
        .get_settings()
        .await
        .map_err(|e| map_domain_error(e).with_instance(SETTINGS_PATH))?;

    let dto = mapper::settings_dto(&settings).map_err(map_domain_error)?;
    Ok(Json(dto))
}

/// Replace the settings with a validated copy of the body
pub async fn replace_settings(
    service: Arc<Service>,
    Json(raw): Json<serde_json::Value>,
) -> Result<Json<SettingsDto>, Problem> {
    let settings = service
        .replace_settings(raw)
        .await
        .map_err(|e| map_domain_error(e).with_instance(SETTINGS_PATH))?;

    let dto = mapper::settings_dto(&settings).map_err(map_domain_error)?;
    Ok(Json(dto))
}

// ===== Render Handlers =====

/// Decide and render both banners for a page view
pub async fn render_preview(
    service: Arc<Service>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, Problem> {
    let ctx = mapper::request_context(req, service.breakpoints());
    let page = service
        .render_page(&ctx)
        .await
        .map_err(|e| map_domain_error(e).with_instance(RENDER_PATH))?;

    Ok(Json(mapper::render_response(page, ctx.viewport)))
}
