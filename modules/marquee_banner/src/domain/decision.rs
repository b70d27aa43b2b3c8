//! Decision engine
//!
//! Pipeline for the text banner: validate, enabled/message gate, schedule,
//! URL targeting. The image banner only has the presence and schedule checks.

use crate::contract::model::{
    BannerSettings, DecisionReason, Evaluation, ImageDecision, ImageReason, RenderDecision,
    RequestContext,
};
use crate::domain::schedule::Scheduler;
use crate::domain::targeting::{self, Targeting};
use crate::domain::validation::Validator;
use serde_json::Value;

/// Visibility rules for both banners
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionEngine {
    validator: Validator,
    scheduler: Scheduler,
}

impl DecisionEngine {
    pub fn new(validator: Validator, scheduler: Scheduler) -> Self {
        Self { validator, scheduler }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Decide the text banner for raw settings
    pub fn decide(&self, raw: &Value, ctx: &RequestContext) -> RenderDecision {
        match self.validator.validate_for_display(raw) {
            Ok(validated) => self.decide_validated(validated.settings, ctx),
            Err(reason) => RenderDecision::hidden(reason, None),
        }
    }

    /// Decide the text banner for an already validated snapshot
    pub fn decide_validated(&self, settings: BannerSettings, ctx: &RequestContext) -> RenderDecision {
        if !settings.enabled {
            return RenderDecision::hidden(DecisionReason::Disabled, Some(settings));
        }
        if settings.message.is_empty() {
            return RenderDecision::hidden(DecisionReason::EmptyMessage, Some(settings));
        }

        let active = self.scheduler.is_active(
            settings.start_date.as_deref(),
            settings.end_date.as_deref(),
            ctx.now,
        );
        if !active {
            return RenderDecision::hidden(DecisionReason::OutsideSchedule, Some(settings));
        }

        match targeting::evaluate(
            &ctx.current_path,
            settings.sitewide,
            &settings.include_urls,
            &settings.exclude_urls,
        ) {
            Targeting::Shown => RenderDecision::visible(settings),
            Targeting::Excluded => RenderDecision::hidden(DecisionReason::Excluded, Some(settings)),
            Targeting::NotIncluded => {
                RenderDecision::hidden(DecisionReason::NotIncluded, Some(settings))
            }
        }
    }

    /// Decide the image banner; URL targeting does not apply to it
    pub fn decide_image(&self, settings: &BannerSettings, ctx: &RequestContext) -> ImageDecision {
        let Some(url) = settings.image.clone() else {
            return ImageDecision {
                show: false,
                reason: ImageReason::NoImage,
                url: None,
            };
        };

        let active = self.scheduler.is_active(
            settings.image_start_date.as_deref(),
            settings.image_end_date.as_deref(),
            ctx.now,
        );
        if active {
            ImageDecision {
                show: true,
                reason: ImageReason::Visible,
                url: Some(url),
            }
        } else {
            ImageDecision {
                show: false,
                reason: ImageReason::OutsideSchedule,
                url: Some(url),
            }
        }
    }

    /// Run both pipelines for raw settings
    ///
    /// The image banner does not depend on the text banner's enable state, so
    /// this always validates in full.
    pub fn evaluate(&self, raw: &Value, ctx: &RequestContext) -> Evaluation {
        let settings = self.validator.validate(raw).settings;
        self.evaluate_validated(settings, ctx)
    }

    /// Run both pipelines against one snapshot
    pub fn evaluate_validated(&self, settings: BannerSettings, ctx: &RequestContext) -> Evaluation {
        let image = self.decide_image(&settings, ctx);
        let text = self.decide_validated(settings, ctx);
        Evaluation { text, image }
    }
}

/// [`DecisionEngine::decide`] with default limits and UTC
pub fn decide(raw: &Value, ctx: &RequestContext) -> RenderDecision {
    DecisionEngine::default().decide(raw, ctx)
}
