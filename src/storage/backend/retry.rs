//! 数据库操作重试
//!
//! 仅对瞬时错误（连接、死锁、锁等待、SQLite BUSY）进行指数退避重试，
//! 唯一约束冲突等业务错误立即返回。

use sea_orm::DbErr;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// 死锁 / 锁超时 / 序列化失败 / SQLITE_BUSY(_RECOVERY, _SNAPSHOT) / SQLITE_LOCKED
const RETRYABLE_SQL_CODES: &[&str] = &[
    "1213", "1205", "40001", "40P01", "5", "261", "517", "6", "262",
];

/// 判断数据库错误是否可重试
pub fn is_retryable_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => {
            is_retryable_runtime_error(runtime_err)
        }
        _ => false,
    }
}

fn is_retryable_runtime_error(err: &sea_orm::error::RuntimeErr) -> bool {
    use sea_orm::error::RuntimeErr;

    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            use std::ops::Deref;
            if let Some(db_err) = sqlx_err.deref().as_database_error()
                && let Some(code) = db_err.code()
                && RETRYABLE_SQL_CODES.contains(&code.as_ref())
            {
                return true;
            }
            is_retryable_message(&sqlx_err.to_string())
        }
        RuntimeErr::Internal(msg) => is_retryable_message(msg),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

/// 错误码不可用时按消息判断
fn is_retryable_message(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    ["deadlock", "lock wait timeout", "database is locked", "serialization failure"]
        .iter()
        .any(|needle| msg.contains(needle))
}

/// 重试配置
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// 指数退避重试执行器
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("'{}' succeeded after {} retries", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) if is_retryable_error(&e) && attempt < config.max_retries => {
                attempt += 1;
                let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
                warn!(
                    "'{}' failed (attempt {}/{}): {}; retrying in {} ms",
                    operation_name,
                    attempt,
                    config.max_retries + 1,
                    e,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// 退避延迟：base * 2^(attempt-1)，封顶 max，再加 0-25% 抖动
fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    use rand::RngExt;
    let exp_delay = base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp_delay.min(max_ms);
    let jitter = rand::rng().random_range(0..=capped / 4);
    capped.saturating_add(jitter)
}
