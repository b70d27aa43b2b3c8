//! Domain layer - business logic and services

pub mod decision;
pub mod events;
pub mod fingerprint;
pub mod markup;
pub mod render;
pub mod repository;
pub mod sanitize;
pub mod schedule;
pub mod service;
pub mod targeting;
pub mod validation;

pub use decision::DecisionEngine;
pub use events::{BannerEvent, EventPublisher, NoOpEventPublisher};
pub use fingerprint::settings_hash;
pub use render::{BannerMarkup, Renderer};
pub use repository::BannerSettingsRepository;
pub use schedule::Scheduler;
pub use service::Service;
pub use validation::{Finding, FindingKind, ValidatedSettings, Validator};
