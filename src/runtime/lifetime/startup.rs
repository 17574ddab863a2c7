use crate::agent::{LocalOrchestrator, TaskOrchestrator};
use crate::config::StorageBackend;
use crate::query::PageLimits;
use crate::services::{AdService, FavoriteService};
use crate::storage::{StorageFactory, StorageHandle, seed};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub struct StartupContext {
    pub storage: StorageHandle,
    pub ad_service: Arc<AdService>,
    pub favorite_service: Arc<FavoriteService>,
    pub orchestrator: Arc<dyn TaskOrchestrator>,
}

/// 准备服务器启动的上下文
/// 包括存储、种子数据和各业务服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = crate::config::get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.info.storage_type);

    // 内存后端每次启动都需要加载种子数据
    if config.database.seed_on_start || config.database.backend == StorageBackend::Memory {
        let inserted = seed::seed_if_empty(storage.ads.as_ref())
            .await
            .context("Failed to seed ad catalogue")?;
        if inserted > 0 {
            info!("Seeded {} ads from bundled fixture", inserted);
        }
    }

    let limits = PageLimits::from_config();
    let ad_service = Arc::new(AdService::new(storage.ads.clone(), limits));
    let favorite_service = Arc::new(FavoriteService::new(storage.favorites.clone(), limits));
    let orchestrator: Arc<dyn TaskOrchestrator> = Arc::new(LocalOrchestrator::from_config());

    let ads = ad_service
        .count()
        .await
        .context("Failed to count ads")?;
    info!(
        "Pre-startup completed in {:?}, {} ads available",
        start_time.elapsed(),
        ads
    );

    Ok(StartupContext {
        storage,
        ad_service,
        favorite_service,
        orchestrator,
    })
}
