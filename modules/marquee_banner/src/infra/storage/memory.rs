//! In-memory settings repository

use crate::domain::repository::BannerSettingsRepository;
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

/// Process-local settings store
#[derive(Default)]
pub struct InMemorySettingsRepository {
    document: RwLock<Option<Value>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a raw document
    pub fn with_document(document: Value) -> Self {
        Self {
            document: RwLock::new(Some(document)),
        }
    }
}

#[async_trait]
impl BannerSettingsRepository for InMemorySettingsRepository {
    async fn load(&self) -> Result<Option<Value>> {
        Ok(self.document.read().clone())
    }

    async fn store(&self, settings: Value) -> Result<()> {
        *self.document.write() = Some(settings);
        Ok(())
    }
}
