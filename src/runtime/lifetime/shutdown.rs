use sea_orm::DatabaseConnection;
use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

pub async fn listen_for_shutdown(db: Option<DatabaseConnection>) {
    // 等待 Ctrl+C 信号
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, closing resources...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    let shutdown_result = timeout(
        Duration::from_secs(SHUTDOWN_TIMEOUT_SECS),
        perform_shutdown_tasks(db),
    )
    .await;

    match shutdown_result {
        Ok(()) => {
            info!("All shutdown tasks completed successfully");
        }
        Err(_) => {
            error!(
                "Shutdown tasks timed out after {} seconds! Forcing exit.",
                SHUTDOWN_TIMEOUT_SECS
            );
            std::process::exit(1);
        }
    }
}

/// 执行所有关闭任务（在超时内调用）
async fn perform_shutdown_tasks(db: Option<DatabaseConnection>) {
    let Some(db) = db else {
        info!("In-memory storage, nothing to close");
        return;
    };

    match db.close().await {
        Ok(()) => info!("Database connection closed"),
        Err(e) => error!("Failed to close database connection: {}", e),
    }
}
