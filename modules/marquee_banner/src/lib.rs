//! Marquee Banner Module
//!
//! Decides whether a scrolling announcement banner (and an optional static
//! image banner) is shown for a page view, and renders the markup for it.
//! Settings arrive as loosely typed admin input and are validated into a
//! snapshot that is safe to render.

// Public exports
pub mod contract;
pub use contract::{
    client::BannerApi, error::BannerError, BannerSettings, ButtonSettings, DecisionReason,
    Evaluation, ImageDecision, ImageReason, PageBanner, RenderDecision, RequestContext,
    ViewportClass,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::BannerModule;

pub mod domain;
pub use domain::decision::decide;
pub use domain::render::{effective_duration, mount, render};
pub use domain::schedule::is_active;
pub use domain::targeting::{normalize, should_display};
pub use domain::validation::validate;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod infra;
