//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error, web};
use serde::Serialize;
use tracing::error;

use super::error_code::ErrorCode;
use super::types::ApiError;
use crate::errors::AdscopeError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 构建成功响应，响应体即数据本身
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, &data)
}

/// 构建错误响应
pub fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    json_response(
        status,
        &ApiError {
            code,
            message: message.to_string(),
        },
    )
}

/// 从 AdscopeError 构建错误响应
///
/// 服务端错误只记录日志，对外返回统一的提示。
pub fn error_from_adscope(err: &AdscopeError, not_found: ErrorCode) -> HttpResponse {
    let status = err.http_status();
    let code = ErrorCode::for_error(err, not_found);
    if err.is_client_error() {
        error_response(status, code, err.message())
    } else {
        error!("Request failed: {}", err.format_simple());
        error_response(status, code, INTERNAL_ERROR_MESSAGE)
    }
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(
    result: crate::errors::Result<T>,
    not_found: ErrorCode,
) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_adscope(&e, not_found),
    }
}

/// 畸形 JSON 请求体返回 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
            let resp = error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                &format!("Invalid JSON body: {}", err),
            );
            error::InternalError::from_response(err, resp).into()
        })
}

/// 无法解析的查询串返回 400
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: error::QueryPayloadError, _req: &HttpRequest| {
        let resp = error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            &format!("Invalid query string: {}", err),
        );
        error::InternalError::from_response(err, resp).into()
    })
}
