//! API 类型定义

use serde::{Deserialize, Serialize};

use super::error_code::ErrorCode;
use crate::storage::StorageInfo;

/// 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

// ============ Health ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: StorageInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ads_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorites_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAgentCheck {
    pub status: String,
    pub tasks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub storage: HealthStorageCheck,
    pub agent: HealthAgentCheck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// 运行秒数
    pub uptime: u64,
    pub checks: HealthChecks,
    pub response_time_ms: u64,
}
