use sea_orm::entity::prelude::*;

/// Tracked ad creative.
///
/// `media_urls` and `tags` hold JSON-encoded string arrays.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub platform: String,
    pub advertiser_name: String,
    #[sea_orm(column_type = "Text")]
    pub headline: String,
    #[sea_orm(column_type = "Text")]
    pub body_text: String,
    pub media_type: String,
    #[sea_orm(column_type = "Text")]
    pub media_urls: String,
    pub cta_label: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub landing_url: Option<String>,
    pub country: String,
    pub language: String,
    pub created_at: DateTimeUtc,
    pub first_seen_at: DateTimeUtc,
    pub last_seen_at: DateTimeUtc,
    pub est_impressions: i64,
    pub spend_bracket: String,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub predicted_ctr: Option<f64>,
    pub predicted_cvr: Option<f64>,
    pub vertical: String,
    #[sea_orm(column_type = "Text")]
    pub tags: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
