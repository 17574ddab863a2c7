//! Favorite management service
//!
//! Validates raw request fields, fills in the default user and delegates
//! the atomic write to `FavoriteRepository`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::info;

use crate::errors::{AdscopeError, Result};
use crate::query::{Page, PageLimits, PageRequest, lenient_i64, paginate};
use crate::storage::{Favorite, FavoriteKey, FavoriteRepository, TargetType};

// ============ Request/Response DTOs ============

/// Body of an add request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub user_id: Option<String>,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub note: Option<String>,
}

/// Identifies a favorite in remove and check requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteTargetRequest {
    pub user_id: Option<String>,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFavoritesRequest {
    pub user_id: Option<String>,
    pub target_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub is_favorited: bool,
    /// Favorites on this target across all users
    pub count: u64,
}

/// One page of a user's favorites plus per-type totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritePage {
    #[serde(flatten)]
    pub page: Page<Favorite>,
    pub counts: BTreeMap<TargetType, u64>,
}

// ============ FavoriteService Implementation ============

pub struct FavoriteService {
    repo: Arc<dyn FavoriteRepository>,
    default_user_id: String,
    max_note_len: usize,
    limits: PageLimits,
}

impl FavoriteService {
    pub fn new(repo: Arc<dyn FavoriteRepository>, limits: PageLimits) -> Self {
        let config = crate::config::get_config();
        Self::with_settings(
            repo,
            config.favorites.default_user_id.clone(),
            config.favorites.max_note_len,
            limits,
        )
    }

    pub fn with_settings(
        repo: Arc<dyn FavoriteRepository>,
        default_user_id: String,
        max_note_len: usize,
        limits: PageLimits,
    ) -> Self {
        Self {
            repo,
            default_user_id,
            max_note_len,
            limits,
        }
    }

    fn resolve_user(&self, user_id: Option<&str>) -> String {
        match user_id.map(str::trim) {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => self.default_user_id.clone(),
        }
    }

    fn parse_target_type(raw: Option<&str>) -> Result<TargetType> {
        let raw = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AdscopeError::validation("targetType is required"))?;
        raw.parse::<TargetType>().map_err(AdscopeError::validation)
    }

    fn resolve_key(
        &self,
        user_id: Option<&str>,
        target_type: Option<&str>,
        target_id: Option<&str>,
    ) -> Result<FavoriteKey> {
        let target_type = Self::parse_target_type(target_type)?;
        let target_id = target_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AdscopeError::validation("targetId is required"))?;
        Ok(FavoriteKey::new(
            self.resolve_user(user_id),
            target_type,
            target_id,
        ))
    }

    fn normalize_note(&self, note: Option<&str>) -> Result<Option<String>> {
        match note.map(str::trim) {
            None | Some("") => Ok(None),
            Some(n) if n.chars().count() > self.max_note_len => Err(AdscopeError::validation(
                format!("note must be at most {} characters", self.max_note_len),
            )),
            Some(n) => Ok(Some(n.to_string())),
        }
    }

    /// Create a favorite; `Conflict` if the tuple already exists
    pub async fn add(&self, req: AddFavoriteRequest) -> Result<Favorite> {
        let key = self.resolve_key(
            req.user_id.as_deref(),
            req.target_type.as_deref(),
            req.target_id.as_deref(),
        )?;
        let note = self.normalize_note(req.note.as_deref())?;

        let favorite = self.repo.insert_unique(Favorite::new(key, note)).await?;
        info!("FavoriteService: added {}", favorite.key());
        Ok(favorite)
    }

    /// Delete a favorite; `NotFound` if it does not exist
    pub async fn remove(&self, req: FavoriteTargetRequest) -> Result<Favorite> {
        let key = self.resolve_key(
            req.user_id.as_deref(),
            req.target_type.as_deref(),
            req.target_id.as_deref(),
        )?;

        let removed = self
            .repo
            .remove(&key)
            .await?
            .ok_or_else(|| AdscopeError::not_found(format!("Favorite not found: {}", key)))?;
        info!("FavoriteService: removed {}", key);
        Ok(removed)
    }

    pub async fn check(&self, req: FavoriteTargetRequest) -> Result<FavoriteStatus> {
        let key = self.resolve_key(
            req.user_id.as_deref(),
            req.target_type.as_deref(),
            req.target_id.as_deref(),
        )?;

        let is_favorited = self.repo.find(&key).await?.is_some();
        let count = self
            .repo
            .count_for_target(key.target_type, &key.target_id)
            .await?;
        Ok(FavoriteStatus {
            is_favorited,
            count,
        })
    }

    /// A user's favorites, newest first, optionally narrowed to one type
    pub async fn list(&self, req: ListFavoritesRequest) -> Result<FavoritePage> {
        let user_id = self.resolve_user(req.user_id.as_deref());
        let target_type = match req.target_type.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<TargetType>().map_err(AdscopeError::validation)?),
        };

        let all = self.repo.list_for_user(&user_id).await?;

        let mut counts: BTreeMap<TargetType, u64> = TargetType::iter().map(|t| (t, 0)).collect();
        for fav in &all {
            *counts.entry(fav.target_type).or_default() += 1;
        }

        let selected: Vec<Favorite> = match target_type {
            Some(t) => all.into_iter().filter(|f| f.target_type == t).collect(),
            None => all,
        };

        let request = PageRequest::resolve(req.page, req.page_size, self.limits);
        Ok(FavoritePage {
            page: paginate(selected, request),
            counts,
        })
    }

    pub async fn count(&self) -> Result<u64> {
        self.repo.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn service() -> FavoriteService {
        FavoriteService::with_settings(
            Arc::new(MemoryStorage::new()),
            "demo-user".to_string(),
            10,
            PageLimits::default(),
        )
    }

    fn add_req(target_id: &str) -> AddFavoriteRequest {
        AddFavoriteRequest {
            target_type: Some("ads".to_string()),
            target_id: Some(target_id.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_defaults_user_and_trims() {
        let svc = service();
        let fav = svc
            .add(AddFavoriteRequest {
                user_id: Some("  ".to_string()),
                target_type: Some("ads".to_string()),
                target_id: Some("  ad-1 ".to_string()),
                note: Some("  keep ".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(fav.user_id, "demo-user");
        assert_eq!(fav.target_id, "ad-1");
        assert_eq!(fav.note.as_deref(), Some("keep"));
    }

    #[tokio::test]
    async fn test_add_validation_errors() {
        let svc = service();
        let missing_id = svc
            .add(AddFavoriteRequest {
                target_type: Some("ads".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(missing_id, AdscopeError::Validation(_)));

        let bad_type = svc
            .add(AddFavoriteRequest {
                target_type: Some("videos".to_string()),
                target_id: Some("x".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(bad_type, AdscopeError::Validation(_)));

        let long_note = svc
            .add(AddFavoriteRequest {
                note: Some("x".repeat(11)),
                ..add_req("ad-1")
            })
            .await
            .unwrap_err();
        assert!(matches!(long_note, AdscopeError::Validation(_)));
        assert_eq!(svc.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_add_conflicts_without_changing_count() {
        let svc = service();
        svc.add(add_req("ad-1")).await.unwrap();
        let err = svc.add(add_req("ad-1")).await.unwrap_err();
        assert!(matches!(err, AdscopeError::Conflict(_)));

        let status = svc
            .check(FavoriteTargetRequest {
                target_type: Some("ads".to_string()),
                target_id: Some("ad-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(
            status,
            FavoriteStatus {
                is_favorited: true,
                count: 1
            }
        );
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let svc = service();
        svc.add(add_req("ad-1")).await.unwrap();
        let err = svc
            .remove(FavoriteTargetRequest {
                target_type: Some("ads".to_string()),
                target_id: Some("ad-2".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AdscopeError::NotFound(_)));
        assert_eq!(svc.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_check_count_is_global_but_flag_is_per_user() {
        let svc = service();
        for user in ["alice", "bob"] {
            svc.add(AddFavoriteRequest {
                user_id: Some(user.to_string()),
                ..add_req("ad-7")
            })
            .await
            .unwrap();
        }
        let status = svc
            .check(FavoriteTargetRequest {
                user_id: Some("carol".to_string()),
                target_type: Some("ads".to_string()),
                target_id: Some("ad-7".to_string()),
            })
            .await
            .unwrap();
        assert!(!status.is_favorited);
        assert_eq!(status.count, 2);
    }

    #[tokio::test]
    async fn test_list_counts_every_type_and_filters() {
        let svc = service();
        svc.add(add_req("ad-1")).await.unwrap();
        svc.add(add_req("ad-2")).await.unwrap();
        svc.add(AddFavoriteRequest {
            target_type: Some("creator".to_string()),
            target_id: Some("c-1".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

        let page = svc
            .list(ListFavoritesRequest {
                target_type: Some("ads".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.page.total, 2);
        assert_eq!(page.counts[&TargetType::Ads], 2);
        assert_eq!(page.counts[&TargetType::Creator], 1);
        assert_eq!(page.counts[&TargetType::Products], 0);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["counts"]["creator"], 1);
    }
}
