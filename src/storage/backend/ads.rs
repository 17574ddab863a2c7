//! Ad catalogue operations for SeaOrmStorage

use async_trait::async_trait;
use sea_orm::{
    EntityTrait, Iterable, PaginatorTrait, QueryOrder, TransactionTrait, sea_query::OnConflict,
};
use tracing::info;

use super::converters::{ad_to_active_model, model_to_ad};
use super::{SeaOrmStorage, retry};
use crate::errors::{AdscopeError, Result};
use crate::storage::{Ad, AdRepository};

use migration::entities::ad;

#[async_trait]
impl AdRepository for SeaOrmStorage {
    async fn load_all(&self) -> Result<Vec<Ad>> {
        let db = &self.db;
        let models = retry::with_retry("load_ads", self.retry_config, || async {
            ad::Entity::find()
                .order_by_asc(ad::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| AdscopeError::database_operation(format!("加载广告失败: {}", e)))?;

        models.into_iter().map(model_to_ad).collect()
    }

    async fn get(&self, id: &str) -> Result<Option<Ad>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(&format!("get_ad({})", id), self.retry_config, || async {
            ad::Entity::find_by_id(id_owned.clone()).one(db).await
        })
        .await
        .map_err(|e| AdscopeError::database_operation(format!("查询广告失败: {}", e)))?;

        model.map(model_to_ad).transpose()
    }

    async fn count(&self) -> Result<u64> {
        let db = &self.db;
        retry::with_retry("count_ads", self.retry_config, || async {
            ad::Entity::find().count(db).await
        })
        .await
        .map_err(|e| AdscopeError::database_operation(format!("统计广告失败: {}", e)))
    }

    async fn insert_many(&self, ads: Vec<Ad>) -> Result<usize> {
        if ads.is_empty() {
            return Ok(0);
        }

        let active_models = ads
            .iter()
            .map(ad_to_active_model)
            .collect::<Result<Vec<_>>>()?;
        let written = active_models.len();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AdscopeError::database_operation(format!("开始事务失败: {}", e)))?;

        // 主键冲突时覆盖除 id 以外的所有列
        ad::Entity::insert_many(active_models)
            .on_conflict(
                OnConflict::column(ad::Column::Id)
                    .update_columns(ad::Column::iter().filter(|c| !matches!(c, ad::Column::Id)))
                    .to_owned(),
            )
            .exec(&txn)
            .await
            .map_err(|e| AdscopeError::database_operation(format!("批量写入广告失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AdscopeError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Upserted {} ads", written);
        Ok(written)
    }
}
