//! In-process storage
//!
//! Default backend and the one used by tests. Data is lost on restart.
//! Ads are kept ordered by id, the same order the SQL backend loads them in.

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{Ad, AdRepository, Favorite, FavoriteKey, FavoriteRepository, TargetType};
use crate::errors::{AdscopeError, Result};

#[derive(Default)]
pub struct MemoryStorage {
    ads: RwLock<Vec<Ad>>,
    favorites: RwLock<Vec<Favorite>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ads(ads: Vec<Ad>) -> Self {
        let mut sorted = Vec::with_capacity(ads.len());
        for ad in ads {
            upsert_sorted(&mut sorted, ad);
        }
        Self {
            ads: RwLock::new(sorted),
            favorites: RwLock::new(Vec::new()),
        }
    }
}

/// 同 id 覆盖，否则按 id 插入到有序位置
fn upsert_sorted(ads: &mut Vec<Ad>, ad: Ad) {
    match ads.binary_search_by(|existing| existing.id.cmp(&ad.id)) {
        Ok(idx) => ads[idx] = ad,
        Err(idx) => ads.insert(idx, ad),
    }
}

#[async_trait]
impl AdRepository for MemoryStorage {
    async fn load_all(&self) -> Result<Vec<Ad>> {
        Ok(self.ads.read().clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Ad>> {
        let guard = self.ads.read();
        Ok(guard
            .binary_search_by(|ad| ad.id.as_str().cmp(id))
            .ok()
            .map(|idx| guard[idx].clone()))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.ads.read().len() as u64)
    }

    async fn insert_many(&self, ads: Vec<Ad>) -> Result<usize> {
        let written = ads.len();
        let mut guard = self.ads.write();
        for ad in ads {
            upsert_sorted(&mut guard, ad);
        }
        Ok(written)
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStorage {
    async fn insert_unique(&self, favorite: Favorite) -> Result<Favorite> {
        // 检查与写入在同一把写锁内完成
        let mut guard = self.favorites.write();
        let key = favorite.key();
        if guard.iter().any(|f| f.matches(&key)) {
            return Err(AdscopeError::conflict(format!(
                "Favorite already exists: {}",
                key
            )));
        }
        guard.push(favorite.clone());
        Ok(favorite)
    }

    async fn remove(&self, key: &FavoriteKey) -> Result<Option<Favorite>> {
        let mut guard = self.favorites.write();
        Ok(guard
            .iter()
            .position(|f| f.matches(key))
            .map(|idx| guard.remove(idx)))
    }

    async fn find(&self, key: &FavoriteKey) -> Result<Option<Favorite>> {
        Ok(self.favorites.read().iter().find(|f| f.matches(key)).cloned())
    }

    async fn count_for_target(&self, target_type: TargetType, target_id: &str) -> Result<u64> {
        Ok(self
            .favorites
            .read()
            .iter()
            .filter(|f| f.target_type == target_type && f.target_id == target_id)
            .count() as u64)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Favorite>> {
        let mut items: Vec<Favorite> = self
            .favorites
            .read()
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        // 与 SQL 后端一致：created_at 降序，同一时刻按 id 降序
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(items)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.favorites.read().len() as u64)
    }
}
