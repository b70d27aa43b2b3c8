//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    BannerApi, BannerError, BannerSettings, Evaluation, PageBanner, RequestContext,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client implementation that directly calls the domain service
///
/// Used by the page-injection layer without HTTP overhead.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl BannerApi for NativeClient {
    async fn get_settings(&self) -> Result<BannerSettings, BannerError> {
        self.service.get_settings().await
    }

    async fn replace_settings(&self, raw: serde_json::Value) -> Result<BannerSettings, BannerError> {
        self.service.replace_settings(raw).await
    }

    async fn evaluate(&self, ctx: &RequestContext) -> Result<Evaluation, BannerError> {
        self.service.evaluate(ctx).await
    }

    async fn render_page(&self, ctx: &RequestContext) -> Result<PageBanner, BannerError> {
        self.service.render_page(ctx).await
    }
}
