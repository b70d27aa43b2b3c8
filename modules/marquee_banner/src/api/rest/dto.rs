//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ===== Settings DTOs =====

/// Validated settings response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsDto {
    /// Validated settings snapshot as stored
    pub settings: serde_json::Value,

    /// Cache key of the snapshot
    #[schema(example = "9f2c4b1a0d3e7f65")]
    pub settings_hash: String,
}

// ===== Render DTOs =====

/// Viewport class of the requesting page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewportDto {
    Mobile,
    Tablet,
    Desktop,
}

/// Render preview request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RenderRequest {
    /// Page path or full URL, query string allowed
    #[schema(example = "/shop/?ref=nav")]
    pub path: String,

    /// Explicit viewport class, takes precedence over `width`
    #[serde(default)]
    pub viewport: Option<ViewportDto>,

    /// Live viewport width in CSS pixels
    #[serde(default)]
    pub width: Option<u32>,

    /// Evaluation time (defaults to now)
    #[serde(default)]
    pub now: Option<chrono::DateTime<chrono::Utc>>,
}

/// Render preview response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenderResponse {
    /// Whether the text banner is shown
    pub show_banner: bool,

    /// Why the text banner is or is not shown
    #[schema(example = "visible")]
    pub banner_reason: String,

    /// Whether the image banner is shown
    pub show_image: bool,

    #[schema(example = "no_image")]
    pub image_reason: String,

    /// Viewport the markup was rendered for
    pub viewport: ViewportDto,

    /// Cache key of the snapshot the markup belongs to
    pub settings_hash: String,

    /// Full injection fragment (style, banner, image)
    pub html: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_html: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_html: Option<String>,
}
