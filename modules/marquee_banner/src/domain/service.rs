//! Domain service - business logic orchestration

use super::decision::DecisionEngine;
use super::events::{BannerEvent, EventPublisher};
use super::fingerprint::settings_hash;
use super::render::Renderer;
use super::repository::BannerSettingsRepository;
use super::validation::{Finding, FindingKind};
use crate::contract::{
    BannerError, BannerSettings, Breakpoints, Evaluation, PageBanner, RequestContext,
};
use serde_json::Value;
use std::sync::Arc;

/// Domain service for the marquee banner
pub struct Service {
    settings_repo: Arc<dyn BannerSettingsRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    engine: DecisionEngine,
    renderer: Renderer,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        settings_repo: Arc<dyn BannerSettingsRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        engine: DecisionEngine,
        renderer: Renderer,
    ) -> Self {
        Self {
            settings_repo,
            event_publisher,
            engine,
            renderer,
        }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn breakpoints(&self) -> &Breakpoints {
        self.renderer.breakpoints()
    }

    // ===== Settings Operations =====

    /// Current validated settings; seeds the store with defaults on first use
    pub async fn get_settings(&self) -> Result<BannerSettings, BannerError> {
        let Some(raw) = self.load().await? else {
            let defaults = BannerSettings::default();
            self.store(&defaults).await?;
            tracing::info!("Seeded banner settings with defaults");
            return Ok(defaults);
        };

        let validated = self.engine.validator().validate(&raw);
        log_findings(&validated.findings);
        Ok(validated.settings)
    }

    /// Replace the stored settings wholesale with a validated copy of `raw`
    pub async fn replace_settings(&self, raw: Value) -> Result<BannerSettings, BannerError> {
        if !raw.is_object() {
            return Err(BannerError::InvalidInput {
                message: "settings must be a JSON object".to_string(),
            });
        }

        let previous_hash = self.load().await?.map(|previous| {
            settings_hash(&self.engine.validator().validate(&previous).settings)
        });

        let validated = self.engine.validator().validate(&raw);
        log_findings(&validated.findings);
        let settings = validated.settings;
        self.store(&settings).await?;

        let hash = settings_hash(&settings);
        tracing::info!(
            "Banner settings replaced (hash {}, {} findings)",
            hash,
            validated.findings.len()
        );

        let event = BannerEvent::replaced(hash, previous_hash);
        if let Err(e) = self.event_publisher.publish(event).await {
            // Log error but don't fail the operation
            tracing::warn!("Failed to publish settings event: {}", e);
        }

        Ok(settings)
    }

    // ===== Page Operations =====

    /// Decide both banners for one page view
    pub async fn evaluate(&self, ctx: &RequestContext) -> Result<Evaluation, BannerError> {
        let settings = self.get_settings().await?;
        Ok(self.engine.evaluate_validated(settings, ctx))
    }

    /// Decide and render both banners for one page view
    pub async fn render_page(&self, ctx: &RequestContext) -> Result<PageBanner, BannerError> {
        let settings = self.get_settings().await?;
        let hash = settings_hash(&settings);
        let evaluation = self.engine.evaluate_validated(settings, ctx);

        let markup = match (&evaluation.text.settings, evaluation.text.show) {
            (Some(settings), true) => self.renderer.render(settings, ctx.viewport),
            _ => None,
        };
        let image_html = match (&evaluation.image.url, evaluation.image.show) {
            (Some(url), true) => Some(self.renderer.render_image(url).to_html()),
            _ => None,
        };

        tracing::debug!(
            "Banner for {}: text {} ({:?}), image {} ({:?})",
            ctx.current_path,
            markup.is_some(),
            evaluation.text.reason,
            image_html.is_some(),
            evaluation.image.reason
        );

        Ok(PageBanner {
            stylesheet: markup.as_ref().map(|m| m.stylesheet.clone()),
            banner_html: markup.as_ref().map(|m| m.to_html()),
            image_html,
            evaluation,
            settings_hash: hash,
        })
    }

    // ===== Helper Methods =====

    async fn load(&self) -> Result<Option<Value>, BannerError> {
        self.settings_repo.load().await.map_err(|e| {
            tracing::error!("Failed to load banner settings: {:#}", e);
            BannerError::storage(e)
        })
    }

    async fn store(&self, settings: &BannerSettings) -> Result<(), BannerError> {
        let value = serde_json::to_value(settings).map_err(|e| {
            tracing::error!("Failed to serialize banner settings: {}", e);
            BannerError::Internal
        })?;
        self.settings_repo.store(value).await.map_err(|e| {
            tracing::error!("Failed to store banner settings: {:#}", e);
            BannerError::storage(e)
        })
    }
}

fn log_findings(findings: &[Finding]) {
    for finding in findings {
        match &finding.kind {
            FindingKind::Neutralized(item) => {
                tracing::warn!("Neutralized unsafe content in {}: {:?}", finding.field, item)
            }
            kind => tracing::debug!("Settings field {} {:?}", finding.field, kind),
        }
    }
}
