use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::StorageBackend;
use crate::errors::Result;

pub mod backend;
pub mod memory;
pub mod models;
pub mod seed;

pub use backend::SeaOrmStorage;
pub use memory::MemoryStorage;
pub use models::{
    Ad, Favorite, FavoriteKey, MediaType, Platform, SpendBracket, StorageInfo, TargetType,
};

/// Read access to the ad catalogue
#[async_trait]
pub trait AdRepository: Send + Sync {
    /// Every ad, in storage order
    async fn load_all(&self) -> Result<Vec<Ad>>;

    async fn get(&self, id: &str) -> Result<Option<Ad>>;

    async fn count(&self) -> Result<u64>;

    /// Insert ads, replacing existing rows with the same id. Returns the number written.
    async fn insert_many(&self, ads: Vec<Ad>) -> Result<usize>;
}

/// User bookmarks
///
/// Implementations make `insert_unique` and `remove` atomic per
/// (user, targetType, targetId): two concurrent inserts of the same key
/// produce one row and one `Conflict`.
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Insert unless the key already exists (`Conflict`)
    async fn insert_unique(&self, favorite: Favorite) -> Result<Favorite>;

    /// Delete the matching row, returning it. `None` if nothing matched.
    async fn remove(&self, key: &FavoriteKey) -> Result<Option<Favorite>>;

    async fn find(&self, key: &FavoriteKey) -> Result<Option<Favorite>>;

    /// Favorites on (targetType, targetId) across all users
    async fn count_for_target(&self, target_type: TargetType, target_id: &str) -> Result<u64>;

    /// A user's favorites, newest first
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Favorite>>;

    async fn count(&self) -> Result<u64>;
}

/// Repositories bundled for the service layer
#[derive(Clone)]
pub struct StorageHandle {
    pub ads: Arc<dyn AdRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub info: StorageInfo,
    /// Present for SQL backends; closed on shutdown
    pub db: Option<DatabaseConnection>,
}

impl StorageHandle {
    pub fn memory() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        Self {
            ads: storage.clone(),
            favorites: storage,
            info: StorageInfo {
                storage_type: StorageBackend::Memory.to_string(),
                persistent: false,
            },
            db: None,
        }
    }

    pub fn sea_orm(storage: SeaOrmStorage) -> Self {
        let info = storage.info();
        let db = storage.get_db().clone();
        let storage = Arc::new(storage);
        Self {
            ads: storage.clone(),
            favorites: storage,
            info,
            db: Some(db),
        }
    }
}

pub struct StorageFactory;

impl StorageFactory {
    /// Build the backend selected by `database.backend`
    pub async fn create() -> Result<StorageHandle> {
        let config = crate::config::get_config();
        let backend = config.database.backend;

        let handle = match backend {
            StorageBackend::Memory => StorageHandle::memory(),
            sql => {
                let database_url = &config.database.database_url;
                // URL 与配置的后端不一致时以 URL 为准
                let inferred = backend::infer_backend_from_url(database_url)?;
                if inferred != sql {
                    tracing::warn!(
                        "database.backend is {} but URL looks like {}; using {}",
                        sql,
                        inferred,
                        inferred
                    );
                }
                StorageHandle::sea_orm(SeaOrmStorage::new(database_url, inferred).await?)
            }
        };

        info!("{} storage ready", handle.info.storage_type.to_uppercase());
        Ok(handle)
    }
}
