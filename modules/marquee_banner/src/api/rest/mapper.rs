//! Mappers between contract models and REST DTOs

use super::dto::{RenderRequest, RenderResponse, SettingsDto, ViewportDto};
use crate::contract::{BannerError, BannerSettings, Breakpoints, PageBanner, RequestContext, ViewportClass};
use crate::domain::settings_hash;
use chrono::Utc;

impl From<ViewportDto> for ViewportClass {
    fn from(dto: ViewportDto) -> Self {
        match dto {
            ViewportDto::Mobile => ViewportClass::Mobile,
            ViewportDto::Tablet => ViewportClass::Tablet,
            ViewportDto::Desktop => ViewportClass::Desktop,
        }
    }
}

impl From<ViewportClass> for ViewportDto {
    fn from(viewport: ViewportClass) -> Self {
        match viewport {
            ViewportClass::Mobile => ViewportDto::Mobile,
            ViewportClass::Tablet => ViewportDto::Tablet,
            ViewportClass::Desktop => ViewportDto::Desktop,
        }
    }
}

pub fn settings_dto(settings: &BannerSettings) -> Result<SettingsDto, BannerError> {
    let value = serde_json::to_value(settings).map_err(|e| {
        tracing::error!("Failed to serialize settings: {}", e);
        BannerError::Internal
    })?;
    Ok(SettingsDto {
        settings: value,
        settings_hash: settings_hash(settings),
    })
}

/// Request context for a render request; the clock is read once, here
pub fn request_context(req: RenderRequest, breakpoints: &Breakpoints) -> RequestContext {
    let viewport = match (req.viewport, req.width) {
        (Some(viewport), _) => viewport.into(),
        (None, Some(width)) => ViewportClass::from_width(width, breakpoints),
        (None, None) => ViewportClass::Desktop,
    };
    RequestContext::new(req.path, req.now.unwrap_or_else(Utc::now), viewport)
}

pub fn render_response(page: PageBanner, viewport: ViewportClass) -> RenderResponse {
    RenderResponse {
        show_banner: page.banner_html.is_some(),
        banner_reason: page.evaluation.text.reason.as_str().to_string(),
        show_image: page.image_html.is_some(),
        image_reason: page.evaluation.image.reason.as_str().to_string(),
        viewport: viewport.into(),
        html: page.to_html(),
        settings_hash: page.settings_hash,
        stylesheet: page.stylesheet,
        banner_html: page.banner_html,
        image_html: page.image_html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(viewport: Option<ViewportDto>, width: Option<u32>) -> RenderRequest {
        RenderRequest {
            path: "/".to_string(),
            viewport,
            width,
            now: None,
        }
    }

    #[test]
    fn test_viewport_resolution() {
        let breakpoints = Breakpoints::default();
        let ctx = request_context(request(None, Some(375)), &breakpoints);
        assert_eq!(ctx.viewport, ViewportClass::Mobile);

        let ctx = request_context(request(None, Some(1000)), &breakpoints);
        assert_eq!(ctx.viewport, ViewportClass::Tablet);

        let ctx = request_context(request(Some(ViewportDto::Desktop), Some(375)), &breakpoints);
        assert_eq!(ctx.viewport, ViewportClass::Desktop);

        let ctx = request_context(request(None, None), &breakpoints);
        assert_eq!(ctx.viewport, ViewportClass::Desktop);
    }
}
