//! Module wiring
//!
//! `BannerModule` is built once at startup and handed to whoever needs the
//! banner: the page-injection layer takes the native client, the HTTP server
//! takes the router.

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::BannerApi;
use crate::domain::{BannerSettingsRepository, EventPublisher, NoOpEventPublisher, Service};
use crate::infra::storage::{InMemorySettingsRepository, JsonFileSettingsRepository};
use std::sync::Arc;

/// Marquee banner module
pub struct BannerModule {
    config: Config,
    service: Arc<Service>,
}

impl BannerModule {
    /// Build the module over explicit collaborators
    pub fn new(
        config: Config,
        settings_repo: Arc<dyn BannerSettingsRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        let service = Arc::new(Service::new(
            settings_repo,
            event_publisher,
            config.decision_engine(),
            config.renderer(),
        ));
        Self { config, service }
    }

    /// Build the module with the storage named by the configuration
    pub fn from_config(config: Config) -> Self {
        let settings_repo: Arc<dyn BannerSettingsRepository> = match &config.settings_file {
            Some(path) => {
                tracing::info!("Banner settings stored in {}", path.display());
                Arc::new(JsonFileSettingsRepository::new(path.clone()))
            }
            None => {
                tracing::info!("Banner settings kept in memory");
                Arc::new(InMemorySettingsRepository::new())
            }
        };

        // Build event publisher (NoOp for now, can be replaced with real implementation)
        Self::new(config, settings_repo, Arc::new(NoOpEventPublisher))
    }

    /// In-memory module with the given configuration
    pub fn in_memory(config: Config) -> Self {
        Self::new(
            config,
            Arc::new(InMemorySettingsRepository::new()),
            Arc::new(NoOpEventPublisher),
        )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// Native client for in-process callers
    pub fn client(&self) -> Arc<dyn BannerApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    /// REST routes with the service attached
    pub fn router(&self) -> axum::Router {
        tracing::info!("Registering marquee banner REST routes");
        crate::api::rest::router(self.service.clone())
    }
}
