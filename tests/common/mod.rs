//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use adscope::agent::{LocalOrchestrator, ScriptedRunner, TaskOrchestrator};
use adscope::query::PageLimits;
use adscope::services::{AdService, FavoriteService};
use adscope::storage::{Ad, MediaType, MemoryStorage, Platform, SpendBracket, seed};

/// Minimal ad with the fields the query pipeline looks at
pub fn make_ad(id: &str, platform: Platform, likes: u64, comments: u64, shares: u64) -> Ad {
    let created = Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap();
    Ad {
        id: id.to_string(),
        platform,
        advertiser_name: format!("Advertiser {}", id),
        headline: format!("Headline {}", id),
        body_text: String::new(),
        media_type: MediaType::Video,
        media_urls: Vec::new(),
        cta_label: None,
        landing_url: None,
        country: "US".to_string(),
        language: "en".to_string(),
        created_at: created,
        first_seen_at: created,
        last_seen_at: created,
        est_impressions: 0,
        spend_bracket: SpendBracket::Low,
        likes,
        comments,
        shares,
        predicted_ctr: None,
        predicted_cvr: None,
        vertical: "general".to_string(),
        tags: BTreeSet::new(),
    }
}

/// Memory store loaded with the bundled fixture
pub async fn seeded_memory() -> Arc<MemoryStorage> {
    let storage = Arc::new(MemoryStorage::new());
    seed::seed(storage.as_ref()).await.expect("seed fixture");
    storage
}

pub struct TestServices {
    pub ads: Arc<AdService>,
    pub favorites: Arc<FavoriteService>,
    pub orchestrator: Arc<dyn TaskOrchestrator>,
}

pub async fn test_services() -> TestServices {
    let storage = seeded_memory().await;
    let limits = PageLimits::default();
    TestServices {
        ads: Arc::new(AdService::new(storage.clone(), limits)),
        favorites: Arc::new(FavoriteService::with_settings(
            storage,
            "demo-user".to_string(),
            500,
            limits,
        )),
        orchestrator: Arc::new(LocalOrchestrator::new(
            Arc::new(ScriptedRunner::new(Duration::from_millis(20))),
            Duration::from_secs(60),
        )),
    }
}
