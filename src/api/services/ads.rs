//! 广告查询端点

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::trace;

use super::error_code::ErrorCode;
use super::helpers::api_result;
use crate::query::AdQuery;
use crate::services::AdService;

/// 过滤、排序并分页的广告列表
pub async fn list_ads(
    query: web::Query<AdQuery>,
    service: web::Data<Arc<AdService>>,
) -> ActixResult<impl Responder> {
    trace!("Ads API: list with {:?}", query);
    Ok(api_result(service.list_ads(&query).await, ErrorCode::NotFound))
}

/// 当前目录中出现过的筛选项
pub async fn filter_options(service: web::Data<Arc<AdService>>) -> ActixResult<impl Responder> {
    Ok(api_result(service.filter_options().await, ErrorCode::NotFound))
}

pub async fn get_ad(
    path: web::Path<String>,
    service: web::Data<Arc<AdService>>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    trace!("Ads API: get {}", id);
    Ok(api_result(service.get_ad(&id).await, ErrorCode::AdNotFound))
}
