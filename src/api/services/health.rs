use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use super::helpers::json_response;
use super::types::{HealthAgentCheck, HealthChecks, HealthResponse, HealthStorageCheck};
use crate::agent::TaskOrchestrator;
use crate::errors::Result;
use crate::services::{AdService, FavoriteService};
use crate::storage::StorageInfo;

const STORAGE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

/// Health Service
///
/// 存储检查只做计数查询，5 秒内无响应视为不健康。
pub struct HealthService;

impl HealthService {
    async fn count_records(
        ads: &AdService,
        favorites: &FavoriteService,
    ) -> Result<(u64, u64)> {
        let ads_count = ads.count().await?;
        let favorites_count = favorites.count().await?;
        Ok((ads_count, favorites_count))
    }

    pub async fn health_check(
        ads: web::Data<Arc<AdService>>,
        favorites: web::Data<Arc<FavoriteService>>,
        orchestrator: web::Data<Arc<dyn TaskOrchestrator>>,
        storage_info: web::Data<StorageInfo>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let backend = storage_info.get_ref().clone();
        let storage_status = match tokio::time::timeout(
            STORAGE_CHECK_TIMEOUT,
            Self::count_records(&ads, &favorites),
        )
        .await
        {
            Ok(Ok((ads_count, favorites_count))) => HealthStorageCheck {
                status: "healthy".to_string(),
                backend,
                ads_count: Some(ads_count),
                favorites_count: Some(favorites_count),
                error: None,
            },
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    ads_count: None,
                    favorites_count: None,
                    error: Some(format!("database error: {}", e.message())),
                }
            }
            Err(_) => {
                error!("Storage health check timeout");
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    ads_count: None,
                    favorites_count: None,
                    error: Some("timeout".to_string()),
                }
            }
        };

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;
        let is_healthy = storage_status.status == "healthy";
        let status = if is_healthy { "healthy" } else { "unhealthy" };

        let body = HealthResponse {
            status: status.to_string(),
            timestamp: now.to_rfc3339(),
            uptime,
            checks: HealthChecks {
                storage: storage_status,
                agent: HealthAgentCheck {
                    status: "healthy".to_string(),
                    tasks: orchestrator.task_count(),
                },
            },
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Health check completed in {:?}, status: {}, uptime: {}s",
            start_time.elapsed(),
            status,
            uptime
        );

        let code = if is_healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        json_response(code, &body)
    }

    // 就绪检查
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由 `/health`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
