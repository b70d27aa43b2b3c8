//! Repository trait for the settings store
//!
//! The store holds a single settings document. Implementations are in
//! infra/storage.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Repository for the banner settings document
#[async_trait]
pub trait BannerSettingsRepository: Send + Sync {
    /// Load the stored document, `None` before the first save
    async fn load(&self) -> Result<Option<Value>>;

    /// Replace the stored document wholesale
    async fn store(&self, settings: Value) -> Result<()>;
}
