//! Domain events for the marquee banner
//!
//! A markup cache keyed by the settings hash listens for `SettingsReplaced`
//! and invalidates entries for the previous hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain event types for the banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum BannerEvent {
    /// Stored settings were replaced by an admin save
    SettingsReplaced(SettingsReplacedEvent),
}

/// Event data for a settings replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsReplacedEvent {
    /// Hash of the newly stored snapshot
    pub settings_hash: String,
    /// Hash of the snapshot that was replaced, if any was stored
    pub previous_hash: Option<String>,
    /// Timestamp of the event
    pub timestamp: DateTime<Utc>,
}

impl BannerEvent {
    /// Create a new SettingsReplaced event
    pub fn replaced(settings_hash: String, previous_hash: Option<String>) -> Self {
        BannerEvent::SettingsReplaced(SettingsReplacedEvent {
            settings_hash,
            previous_hash,
            timestamp: Utc::now(),
        })
    }
}

/// Event publisher trait for publishing domain events
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event to whoever caches banner output
    async fn publish(&self, event: BannerEvent) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: BannerEvent) -> anyhow::Result<()> {
        // No-op: events are not published
        Ok(())
    }
}
