use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{Page, PageLimits, PageRequest, lenient_i64, non_empty, paginate};
use crate::storage::Ad;

/// Ordering applied to ad listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Latest,
    Engagement,
    Ctr,
    Cvr,
    #[default]
    Hot,
}

impl SortKey {
    /// Unknown or missing values fall back to `Hot`
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("latest") => Self::Latest,
            Some("engagement") => Self::Engagement,
            Some("ctr") => Self::Ctr,
            Some("cvr") => Self::Cvr,
            _ => Self::Hot,
        }
    }
}

/// Query parameters accepted by the ads listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdQuery {
    pub platform: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub vertical: Option<String>,
    pub media_type: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub page_size: Option<i64>,
}

impl AdQuery {
    pub fn sort_key(&self) -> SortKey {
        SortKey::from_param(self.sort.as_deref())
    }

    pub fn page_request(&self, limits: PageLimits) -> PageRequest {
        PageRequest::resolve(self.page, self.page_size, limits)
    }
}

/// Prepared predicate so the search term is lowercased once
struct AdFilter<'a> {
    platform: Option<&'a str>,
    country: Option<&'a str>,
    language: Option<&'a str>,
    vertical: Option<&'a str>,
    media_type: Option<&'a str>,
    search: Option<String>,
}

impl<'a> AdFilter<'a> {
    fn new(query: &'a AdQuery) -> Self {
        Self {
            platform: non_empty(&query.platform),
            country: non_empty(&query.country),
            language: non_empty(&query.language),
            vertical: non_empty(&query.vertical),
            media_type: non_empty(&query.media_type),
            search: non_empty(&query.search).map(|s| s.to_lowercase()),
        }
    }

    fn matches(&self, ad: &Ad) -> bool {
        // 等值过滤：区分大小写，全部满足
        let eq = |wanted: Option<&str>, actual: &str| wanted.is_none_or(|w| w == actual);

        if !eq(self.platform, ad.platform.as_ref())
            || !eq(self.country, &ad.country)
            || !eq(self.language, &ad.language)
            || !eq(self.vertical, &ad.vertical)
            || !eq(self.media_type, ad.media_type.as_ref())
        {
            return false;
        }

        // 搜索：任一文本字段包含即匹配（不区分大小写）
        match self.search {
            Some(ref needle) => {
                ad.headline.to_lowercase().contains(needle)
                    || ad.body_text.to_lowercase().contains(needle)
                    || ad.advertiser_name.to_lowercase().contains(needle)
            }
            None => true,
        }
    }
}

/// Whether a single ad satisfies every filter and the search term of `query`
pub fn matches_filters(ad: &Ad, query: &AdQuery) -> bool {
    AdFilter::new(query).matches(ad)
}

/// Stable descending sort; ties keep their input order
pub fn sort_ads(ads: &mut [Ad], key: SortKey) {
    fn desc_f64(a: f64, b: f64) -> Ordering {
        b.total_cmp(&a)
    }

    match key {
        SortKey::Latest => ads.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Engagement => ads.sort_by(|a, b| b.engagement().cmp(&a.engagement())),
        SortKey::Ctr => ads.sort_by(|a, b| {
            desc_f64(
                a.predicted_ctr.unwrap_or(0.0),
                b.predicted_ctr.unwrap_or(0.0),
            )
        }),
        SortKey::Cvr => ads.sort_by(|a, b| {
            desc_f64(
                a.predicted_cvr.unwrap_or(0.0),
                b.predicted_cvr.unwrap_or(0.0),
            )
        }),
        SortKey::Hot => ads.sort_by(|a, b| desc_f64(a.hot_score(), b.hot_score())),
    }
}

/// Filter, sort and paginate a collection of ads
pub fn query_ads(records: Vec<Ad>, query: &AdQuery, limits: PageLimits) -> Page<Ad> {
    let filter = AdFilter::new(query);
    let mut matched: Vec<Ad> = records.into_iter().filter(|ad| filter.matches(ad)).collect();

    sort_ads(&mut matched, query.sort_key());

    paginate(matched, query.page_request(limits))
}
