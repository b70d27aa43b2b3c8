//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.

pub mod client;
pub mod error;
pub mod model;

pub use client::BannerApi;
pub use error::BannerError;
pub use model::{
    AllowList, BannerSettings, BorderStyle, Breakpoints, ButtonSettings, DecisionReason,
    Evaluation, FontFamily, FontWeight, HexColor, ImageDecision, ImageReason, LockPosition,
    PageBanner, RenderDecision, RequestContext, ViewportClass,
};
