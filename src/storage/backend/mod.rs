//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod ads;
mod connection;
mod converters;
mod favorites;
pub mod retry;

use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::config::StorageBackend;
use crate::errors::{AdscopeError, Result};
use crate::storage::models::StorageInfo;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{ad_to_active_model, favorite_to_active_model, model_to_ad, model_to_favorite};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<StorageBackend> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok(StorageBackend::Sqlite)
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok(StorageBackend::Mysql)
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok(StorageBackend::Postgres)
    } else {
        Err(AdscopeError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend: StorageBackend,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend: StorageBackend) -> Result<Self> {
        if database_url.is_empty() {
            return Err(AdscopeError::database_config("database_url 未设置"));
        }
        if !backend.is_sql() {
            return Err(AdscopeError::database_config(format!(
                "{} is not a SQL backend",
                backend
            )));
        }

        let config = crate::config::get_config();
        let retry_config = retry::RetryConfig {
            max_retries: config.database.retry_count,
            base_delay_ms: config.database.retry_base_delay_ms,
            max_delay_ms: config.database.retry_max_delay_ms,
        };

        let db = if backend == StorageBackend::Sqlite {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend).await?
        };

        run_migrations(&db).await?;

        warn!("{} Storage initialized.", backend.as_ref().to_uppercase());
        Ok(Self {
            db,
            backend,
            retry_config,
        })
    }

    pub fn info(&self) -> StorageInfo {
        StorageInfo {
            storage_type: self.backend.to_string(),
            persistent: true,
        }
    }

    /// 获取数据库连接（关闭连接等需要直接访问数据库的场景）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
