//! Native client trait for inter-module communication
//!
//! The page-injection layer and the admin layer call the banner through this trait.
//! NO HTTP - direct function calls.

use super::{
    error::BannerError,
    model::{BannerSettings, Evaluation, PageBanner, RequestContext},
};
use async_trait::async_trait;

/// Banner API for in-process callers
#[async_trait]
pub trait BannerApi: Send + Sync {
    /// Current validated settings (defaults on first install)
    async fn get_settings(&self) -> Result<BannerSettings, BannerError>;

    /// Replace the stored settings wholesale with a validated copy of `raw`
    async fn replace_settings(&self, raw: serde_json::Value) -> Result<BannerSettings, BannerError>;

    /// Decide visibility of both banners for one page view
    async fn evaluate(&self, ctx: &RequestContext) -> Result<Evaluation, BannerError>;

    /// Decide and render both banners for one page view
    async fn render_page(&self, ctx: &RequestContext) -> Result<PageBanner, BannerError>;
}
