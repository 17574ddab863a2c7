//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 广告错误
/// - 3000-3099: 收藏错误
/// - 4000-4099: Agent 任务错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 广告错误 2000-2099
    AdNotFound = 2000,

    // 收藏错误 3000-3099
    FavoriteNotFound = 3000,
    FavoriteAlreadyExists = 3001,

    // Agent 任务错误 4000-4099
    TaskNotFound = 4000,
}

impl ErrorCode {
    /// 将 `AdscopeError` 映射为错误码
    ///
    /// `not_found` 是调用方所在资源域的 404 错误码。
    pub fn for_error(err: &crate::errors::AdscopeError, not_found: ErrorCode) -> Self {
        use crate::errors::AdscopeError;
        match err {
            AdscopeError::Validation(_) => Self::BadRequest,
            AdscopeError::NotFound(_) => not_found,
            AdscopeError::Conflict(_) => Self::FavoriteAlreadyExists,
            _ => Self::InternalServerError,
        }
    }
}
