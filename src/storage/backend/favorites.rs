//! Favorite operations for SeaOrmStorage
//!
//! Insert and remove run the existence check and the write in one
//! transaction. The unique index on (user_id, target_type, target_id)
//! catches inserts that race past the check.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    SqlErr, TransactionTrait,
};
use tracing::{debug, info};

use super::converters::{favorite_to_active_model, model_to_favorite};
use super::{SeaOrmStorage, retry};
use crate::errors::{AdscopeError, Result};
use crate::storage::{Favorite, FavoriteKey, FavoriteRepository, TargetType};

use migration::entities::favorite;

async fn find_model<C: ConnectionTrait>(
    conn: &C,
    key: &FavoriteKey,
) -> std::result::Result<Option<favorite::Model>, DbErr> {
    favorite::Entity::find()
        .filter(favorite::Column::UserId.eq(key.user_id.as_str()))
        .filter(favorite::Column::TargetType.eq(key.target_type.as_ref()))
        .filter(favorite::Column::TargetId.eq(key.target_id.as_str()))
        .one(conn)
        .await
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn conflict(key: &FavoriteKey) -> AdscopeError {
    AdscopeError::conflict(format!("Favorite already exists: {}", key))
}

#[async_trait]
impl FavoriteRepository for SeaOrmStorage {
    async fn insert_unique(&self, fav: Favorite) -> Result<Favorite> {
        let db = &self.db;
        let key = fav.key();

        let inserted = retry::with_retry(
            &format!("insert_favorite({})", key),
            self.retry_config,
            || {
                let active = favorite_to_active_model(&fav);
                let key = &key;
                async move {
                    let txn = db.begin().await?;
                    if find_model(&txn, key).await?.is_some() {
                        txn.rollback().await?;
                        return Ok(false);
                    }
                    favorite::Entity::insert(active).exec(&txn).await?;
                    txn.commit().await?;
                    Ok(true)
                }
            },
        )
        .await;

        match inserted {
            Ok(true) => {
                info!("Favorite added: {}", key);
                Ok(fav)
            }
            Ok(false) => Err(conflict(&key)),
            Err(e) if is_unique_violation(&e) => {
                debug!("Concurrent insert hit unique index: {}", key);
                Err(conflict(&key))
            }
            Err(e) => Err(AdscopeError::database_operation(format!(
                "添加收藏失败: {}",
                e
            ))),
        }
    }

    async fn remove(&self, key: &FavoriteKey) -> Result<Option<Favorite>> {
        let db = &self.db;

        let removed = retry::with_retry(
            &format!("remove_favorite({})", key),
            self.retry_config,
            || async move {
                let txn = db.begin().await?;
                let Some(model) = find_model(&txn, key).await? else {
                    txn.rollback().await?;
                    return Ok(None);
                };
                let result = favorite::Entity::delete_by_id(model.id.clone())
                    .exec(&txn)
                    .await?;
                txn.commit().await?;
                // 并发删除时另一方已删掉该行
                Ok((result.rows_affected > 0).then_some(model))
            },
        )
        .await
        .map_err(|e| AdscopeError::database_operation(format!("删除收藏失败: {}", e)))?;

        match removed {
            Some(model) => {
                info!("Favorite removed: {}", key);
                model_to_favorite(model).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn find(&self, key: &FavoriteKey) -> Result<Option<Favorite>> {
        let db = &self.db;
        let model = retry::with_retry("find_favorite", self.retry_config, || async {
            find_model(db, key).await
        })
        .await
        .map_err(|e| AdscopeError::database_operation(format!("查询收藏失败: {}", e)))?;

        model.map(model_to_favorite).transpose()
    }

    async fn count_for_target(&self, target_type: TargetType, target_id: &str) -> Result<u64> {
        let db = &self.db;
        retry::with_retry("count_favorites_for_target", self.retry_config, || async {
            favorite::Entity::find()
                .filter(favorite::Column::TargetType.eq(target_type.as_ref()))
                .filter(favorite::Column::TargetId.eq(target_id))
                .count(db)
                .await
        })
        .await
        .map_err(|e| AdscopeError::database_operation(format!("统计收藏失败: {}", e)))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Favorite>> {
        let db = &self.db;
        let models = retry::with_retry("list_favorites", self.retry_config, || async {
            favorite::Entity::find()
                .filter(favorite::Column::UserId.eq(user_id))
                .order_by_desc(favorite::Column::CreatedAt)
                .order_by_desc(favorite::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| AdscopeError::database_operation(format!("查询收藏列表失败: {}", e)))?;

        models.into_iter().map(model_to_favorite).collect()
    }

    async fn count(&self) -> Result<u64> {
        let db = &self.db;
        retry::with_retry("count_favorites", self.retry_config, || async {
            favorite::Entity::find().count(db).await
        })
        .await
        .map_err(|e| AdscopeError::database_operation(format!("统计收藏失败: {}", e)))
    }
}
