use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

/// Ad network a creative was observed on
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Facebook,
    Tiktok,
    Instagram,
    Youtube,
    Other,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MediaType {
    Image,
    Video,
    Carousel,
    ShortDrama,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SpendBracket {
    Low,
    Medium,
    High,
}

/// What a favorite points at
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TargetType {
    Ads,
    Creative,
    Products,
    Creator,
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for TargetType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ads" => Ok(Self::Ads),
            "creative" => Ok(Self::Creative),
            "products" => Ok(Self::Products),
            "creator" => Ok(Self::Creator),
            _ => Err(format!(
                "Invalid targetType: '{}'. Valid: ads, creative, products, creator",
                s
            )),
        }
    }
}

/// A tracked advertising creative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: String,
    pub platform: Platform,
    pub advertiser_name: String,
    pub headline: String,
    pub body_text: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub cta_label: Option<String>,
    #[serde(default)]
    pub landing_url: Option<String>,
    pub country: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    #[serde(default)]
    pub est_impressions: u64,
    pub spend_bracket: SpendBracket,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub predicted_ctr: Option<f64>,
    #[serde(default)]
    pub predicted_cvr: Option<f64>,
    pub vertical: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Ad {
    /// likes + comments + shares
    pub fn engagement(&self) -> u64 {
        self.likes
            .saturating_add(self.comments)
            .saturating_add(self.shares)
    }

    /// Weighted engagement scaled by predicted CTR.
    ///
    /// A missing CTR counts as 1 so that unscored creatives keep their
    /// engagement weight instead of collapsing to zero.
    pub fn hot_score(&self) -> f64 {
        let weighted =
            self.likes as f64 * 0.5 + self.comments as f64 * 2.0 + self.shares as f64 * 3.0;
        weighted * self.predicted_ctr.unwrap_or(1.0)
    }
}

/// Identifies a favorite independently of its generated id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FavoriteKey {
    pub user_id: String,
    pub target_type: TargetType,
    pub target_id: String,
}

impl FavoriteKey {
    pub fn new(
        user_id: impl Into<String>,
        target_type: TargetType,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            target_type,
            target_id: target_id.into(),
        }
    }
}

impl std::fmt::Display for FavoriteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.user_id, self.target_type, self.target_id)
    }
}

/// A user-scoped bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub target_type: TargetType,
    pub target_id: String,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(key: FavoriteKey, note: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: key.user_id,
            target_type: key.target_type,
            target_id: key.target_id,
            note,
            created_at: Utc::now(),
        }
    }

    pub fn matches(&self, key: &FavoriteKey) -> bool {
        self.user_id == key.user_id
            && self.target_type == key.target_type
            && self.target_id == key.target_id
    }

    pub fn key(&self) -> FavoriteKey {
        FavoriteKey::new(self.user_id.clone(), self.target_type, self.target_id.clone())
    }
}

/// Storage backend description reported by health checks
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub storage_type: String,
    pub persistent: bool,
}
