use std::collections::BTreeSet;
use std::str::FromStr;

use crate::errors::{AdscopeError, Result};
use crate::storage::{Ad, Favorite, MediaType, Platform, SpendBracket, TargetType};
use migration::entities::{ad, favorite};

fn parse_column<T: FromStr>(column: &str, value: &str, row_id: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        AdscopeError::serialization(format!(
            "row {}: invalid {} value '{}'",
            row_id, column, value
        ))
    })
}

fn decode_json_list<T: serde::de::DeserializeOwned + Default>(
    column: &str,
    raw: &str,
    row_id: &str,
) -> Result<T> {
    if raw.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(raw).map_err(|e| {
        AdscopeError::serialization(format!("row {}: invalid {} JSON: {}", row_id, column, e))
    })
}

/// 计数列不会为负，异常数据按 0 处理
fn non_negative(value: i64) -> u64 {
    value.max(0) as u64
}

/// 将 Sea-ORM Model 转换为 Ad
pub fn model_to_ad(model: ad::Model) -> Result<Ad> {
    let id = model.id;
    let platform: Platform = parse_column("platform", &model.platform, &id)?;
    let media_type: MediaType = parse_column("media_type", &model.media_type, &id)?;
    let spend_bracket: SpendBracket = parse_column("spend_bracket", &model.spend_bracket, &id)?;
    let media_urls: Vec<String> = decode_json_list("media_urls", &model.media_urls, &id)?;
    let tags: BTreeSet<String> = decode_json_list("tags", &model.tags, &id)?;

    Ok(Ad {
        id,
        platform,
        advertiser_name: model.advertiser_name,
        headline: model.headline,
        body_text: model.body_text,
        media_type,
        media_urls,
        cta_label: model.cta_label,
        landing_url: model.landing_url,
        country: model.country,
        language: model.language,
        created_at: model.created_at,
        first_seen_at: model.first_seen_at,
        last_seen_at: model.last_seen_at,
        est_impressions: non_negative(model.est_impressions),
        spend_bracket,
        likes: non_negative(model.likes),
        comments: non_negative(model.comments),
        shares: non_negative(model.shares),
        predicted_ctr: model.predicted_ctr,
        predicted_cvr: model.predicted_cvr,
        vertical: model.vertical,
        tags,
    })
}

/// 将 Ad 转换为 ActiveModel（插入 / upsert）
pub fn ad_to_active_model(ad: &Ad) -> Result<ad::ActiveModel> {
    use sea_orm::ActiveValue::Set;

    Ok(ad::ActiveModel {
        id: Set(ad.id.clone()),
        platform: Set(ad.platform.as_ref().to_string()),
        advertiser_name: Set(ad.advertiser_name.clone()),
        headline: Set(ad.headline.clone()),
        body_text: Set(ad.body_text.clone()),
        media_type: Set(ad.media_type.as_ref().to_string()),
        media_urls: Set(serde_json::to_string(&ad.media_urls)?),
        cta_label: Set(ad.cta_label.clone()),
        landing_url: Set(ad.landing_url.clone()),
        country: Set(ad.country.clone()),
        language: Set(ad.language.clone()),
        created_at: Set(ad.created_at),
        first_seen_at: Set(ad.first_seen_at),
        last_seen_at: Set(ad.last_seen_at),
        est_impressions: Set(ad.est_impressions.min(i64::MAX as u64) as i64),
        spend_bracket: Set(ad.spend_bracket.as_ref().to_string()),
        likes: Set(ad.likes.min(i64::MAX as u64) as i64),
        comments: Set(ad.comments.min(i64::MAX as u64) as i64),
        shares: Set(ad.shares.min(i64::MAX as u64) as i64),
        predicted_ctr: Set(ad.predicted_ctr),
        predicted_cvr: Set(ad.predicted_cvr),
        vertical: Set(ad.vertical.clone()),
        tags: Set(serde_json::to_string(&ad.tags)?),
    })
}

pub fn model_to_favorite(model: favorite::Model) -> Result<Favorite> {
    let target_type: TargetType = model.target_type.parse().map_err(|_| {
        AdscopeError::serialization(format!(
            "row {}: invalid target_type value '{}'",
            model.id, model.target_type
        ))
    })?;

    Ok(Favorite {
        id: model.id,
        user_id: model.user_id,
        target_type,
        target_id: model.target_id,
        note: model.note,
        created_at: model.created_at,
    })
}

pub fn favorite_to_active_model(fav: &Favorite) -> favorite::ActiveModel {
    use sea_orm::ActiveValue::Set;

    favorite::ActiveModel {
        id: Set(fav.id.clone()),
        user_id: Set(fav.user_id.clone()),
        target_type: Set(fav.target_type.to_string()),
        target_id: Set(fav.target_id.clone()),
        note: Set(fav.note.clone()),
        created_at: Set(fav.created_at),
    }
}
