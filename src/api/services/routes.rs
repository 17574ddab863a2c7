//! API 路由配置

use actix_web::web;

use super::ads::{filter_options, get_ad, list_ads};
use super::agent::{get_task, stream_task, submit_task};
use super::favorites::{add_favorite, check_favorite, list_favorites, remove_favorite};
use super::helpers::{json_config, query_config};

/// 广告路由 `/ads`
///
/// - GET/HEAD /ads - 过滤、排序、分页
/// - GET /ads/filters - 可选筛选项
/// - GET/HEAD /ads/{id} - 单条广告
pub fn ads_routes() -> actix_web::Scope {
    web::scope("/ads")
        .route("", web::get().to(list_ads))
        .route("", web::head().to(list_ads))
        // 必须在 /{id} 之前
        .route("/filters", web::get().to(filter_options))
        .route("/{id}", web::get().to(get_ad))
        .route("/{id}", web::head().to(get_ad))
}

/// 收藏路由 `/favorites`
pub fn favorites_routes() -> actix_web::Scope {
    web::scope("/favorites")
        .route("", web::get().to(list_favorites))
        .route("", web::post().to(add_favorite))
        .route("", web::delete().to(remove_favorite))
        .route("/check", web::get().to(check_favorite))
}

/// Agent 路由 `/agent`
pub fn agent_routes() -> actix_web::Scope {
    web::scope("/agent")
        .route("/tasks", web::post().to(submit_task))
        .route("/tasks/{id}", web::get().to(get_task))
        .route("/tasks/{id}/stream", web::get().to(stream_task))
}

/// 全部业务路由 `/api`
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .app_data(json_config())
        .app_data(query_config())
        .service(ads_routes())
        .service(favorites_routes())
        .service(agent_routes())
}
