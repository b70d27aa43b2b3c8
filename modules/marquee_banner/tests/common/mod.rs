//! Common test utilities: mock collaborators, request contexts, output helpers
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use marquee_banner::contract::{RequestContext, ViewportClass};
use marquee_banner::domain::{Service, Validator, DecisionEngine, Renderer, Scheduler};
use std::sync::Arc;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

pub fn print_json(label: &str, value: &serde_json::Value) {
    println!(
        "   {}: {}",
        label,
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "N/A".to_string())
    );
}

pub fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

/// Request context at a fixed instant
pub fn ctx(path: &str, now: &str, viewport: ViewportClass) -> RequestContext {
    RequestContext::new(path, at(now), viewport)
}

pub fn desktop(path: &str, now: &str) -> RequestContext {
    ctx(path, now, ViewportClass::Desktop)
}

// Mock collaborators for testing
pub mod mocks {
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use marquee_banner::domain::{BannerEvent, BannerSettingsRepository, EventPublisher};
    use parking_lot::RwLock;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Settings store that counts writes
    #[derive(Default)]
    pub struct MockSettingsRepo {
        document: RwLock<Option<Value>>,
        stores: AtomicUsize,
    }

    impl MockSettingsRepo {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_document(document: Value) -> Self {
            Self {
                document: RwLock::new(Some(document)),
                stores: AtomicUsize::new(0),
            }
        }

        pub fn document(&self) -> Option<Value> {
            self.document.read().clone()
        }

        pub fn store_count(&self) -> usize {
            self.stores.load(Ordering::SeqCst)
        }

        /// Print verbose information about repository state
        pub fn print_state(&self, context: &str) {
            println!("\n========== SettingsRepository State: {} ==========", context);
            println!("Writes: {}", self.store_count());
            match self.document.read().as_ref() {
                None => println!("  (empty)"),
                Some(document) => println!(
                    "  {}",
                    serde_json::to_string_pretty(document).unwrap_or_else(|_| "N/A".to_string())
                ),
            }
            println!("================================================================\n");
        }
    }

    #[async_trait]
    impl BannerSettingsRepository for MockSettingsRepo {
        async fn load(&self) -> Result<Option<Value>> {
            Ok(self.document.read().clone())
        }

        async fn store(&self, settings: Value) -> Result<()> {
            *self.document.write() = Some(settings);
            self.stores.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Settings store whose backend is down
    pub struct FailingSettingsRepo;

    #[async_trait]
    impl BannerSettingsRepository for FailingSettingsRepo {
        async fn load(&self) -> Result<Option<Value>> {
            Err(anyhow!("connection refused"))
        }

        async fn store(&self, _settings: Value) -> Result<()> {
            Err(anyhow!("connection refused"))
        }
    }

    /// Publisher that keeps every event
    #[derive(Default)]
    pub struct RecordingPublisher {
        events: RwLock<Vec<BannerEvent>>,
    }

    impl RecordingPublisher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<BannerEvent> {
            self.events.read().clone()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: BannerEvent) -> Result<()> {
            self.events.write().push(event);
            Ok(())
        }
    }

    /// Publisher whose broker is down
    pub struct FailingPublisher;

    #[async_trait]
    impl EventPublisher for FailingPublisher {
        async fn publish(&self, _event: BannerEvent) -> Result<()> {
            Err(anyhow!("broker unavailable"))
        }
    }
}

/// Service over a mock store and a recording publisher
pub fn create_test_service() -> (
    Arc<Service>,
    Arc<mocks::MockSettingsRepo>,
    Arc<mocks::RecordingPublisher>,
) {
    create_test_service_with_repo(mocks::MockSettingsRepo::new())
}

pub fn create_test_service_with_repo(
    repo: mocks::MockSettingsRepo,
) -> (
    Arc<Service>,
    Arc<mocks::MockSettingsRepo>,
    Arc<mocks::RecordingPublisher>,
) {
    let repo = Arc::new(repo);
    let publisher = Arc::new(mocks::RecordingPublisher::new());
    let engine = DecisionEngine::new(Validator::default(), Scheduler::default());
    let service = Arc::new(Service::new(
        repo.clone(),
        publisher.clone(),
        engine,
        Renderer::default(),
    ));
    (service, repo, publisher)
}
