//! 收藏端点

use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::trace;

use super::error_code::ErrorCode;
use super::helpers::api_result;
use crate::services::{
    AddFavoriteRequest, FavoriteService, FavoriteTargetRequest, ListFavoritesRequest,
};

pub async fn list_favorites(
    query: web::Query<ListFavoritesRequest>,
    service: web::Data<Arc<FavoriteService>>,
) -> ActixResult<impl Responder> {
    trace!("Favorites API: list with {:?}", query);
    Ok(api_result(
        service.list(query.into_inner()).await,
        ErrorCode::FavoriteNotFound,
    ))
}

/// 重复收藏返回 409
pub async fn add_favorite(
    body: web::Json<AddFavoriteRequest>,
    service: web::Data<Arc<FavoriteService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        service.add(body.into_inner()).await,
        ErrorCode::FavoriteNotFound,
    ))
}

/// 不存在的收藏返回 404
pub async fn remove_favorite(
    body: web::Json<FavoriteTargetRequest>,
    service: web::Data<Arc<FavoriteService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        service.remove(body.into_inner()).await,
        ErrorCode::FavoriteNotFound,
    ))
}

pub async fn check_favorite(
    query: web::Query<FavoriteTargetRequest>,
    service: web::Data<Arc<FavoriteService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        service.check(query.into_inner()).await,
        ErrorCode::FavoriteNotFound,
    ))
}
