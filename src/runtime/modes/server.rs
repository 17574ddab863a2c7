//! Server mode
//!
//! Builds the shared services and runs the actix-web server until it exits
//! or Ctrl+C is received.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::{Method, header},
    middleware::Compress,
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::api::services::{AppStartTime, SseSettings, api_routes, health_routes};
use crate::config::CorsConfig;
use crate::runtime::lifetime;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if cors_config.enabled && cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    }
}

/// Build CORS middleware from configuration
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // 未启用时使用浏览器默认的同源策略
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods([Method::GET, Method::HEAD, Method::POST, Method::DELETE])
        .allowed_headers([header::CONTENT_TYPE, header::ACCEPT, header::CACHE_CONTROL])
        .expose_headers([header::HeaderName::from_static(
            crate::api::middleware::request_id::REQUEST_ID_HEADER,
        )])
        .max_age(cors_config.max_age);

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let config = crate::config::get_config();
    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let sse_settings = SseSettings::from_config();
    let storage_info = startup.storage.info.clone();
    let ad_service = startup.ad_service.clone();
    let favorite_service = startup.favorite_service.clone();
    let orchestrator = startup.orchestrator.clone();
    let db_for_shutdown = startup.storage.db.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TimingMiddleware) // 最外层，记录请求延迟
            .wrap(RequestIdMiddleware)
            .wrap(build_cors_middleware(&cors_config))
            .wrap(Compress::default())
            .app_data(web::Data::new(ad_service.clone()))
            .app_data(web::Data::new(favorite_service.clone()))
            .app_data(web::Data::new(orchestrator.clone()))
            .app_data(web::Data::new(storage_info.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::Data::new(sse_settings))
            .service(api_routes())
            .service(health_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(db_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
