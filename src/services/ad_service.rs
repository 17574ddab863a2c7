//! Ad catalogue service
//!
//! Thin layer over `AdRepository`: listing runs the query pipeline over the
//! full catalogue, detail lookups map a miss to `NotFound`.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AdscopeError, Result};
use crate::query::{AdQuery, Page, PageLimits, query_ads};
use crate::storage::{Ad, AdRepository};

/// Distinct values present in the catalogue, for filter widgets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub platforms: Vec<String>,
    pub countries: Vec<String>,
    pub languages: Vec<String>,
    pub verticals: Vec<String>,
    pub media_types: Vec<String>,
}

pub struct AdService {
    repo: Arc<dyn AdRepository>,
    limits: PageLimits,
}

impl AdService {
    pub fn new(repo: Arc<dyn AdRepository>, limits: PageLimits) -> Self {
        Self { repo, limits }
    }

    pub async fn list_ads(&self, query: &AdQuery) -> Result<Page<Ad>> {
        let records = self.repo.load_all().await?;
        let scanned = records.len();
        let page = query_ads(records, query, self.limits);
        debug!(
            "AdService: scanned {} ads, {} matched, returning page {} ({} items)",
            scanned,
            page.total,
            page.page,
            page.items.len()
        );
        Ok(page)
    }

    pub async fn get_ad(&self, id: &str) -> Result<Ad> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| AdscopeError::not_found(format!("Ad '{}' not found", id)))
    }

    pub async fn filter_options(&self) -> Result<FilterOptions> {
        let records = self.repo.load_all().await?;

        let mut platforms = BTreeSet::new();
        let mut countries = BTreeSet::new();
        let mut languages = BTreeSet::new();
        let mut verticals = BTreeSet::new();
        let mut media_types = BTreeSet::new();

        for ad in &records {
            platforms.insert(ad.platform.as_ref().to_string());
            countries.insert(ad.country.clone());
            languages.insert(ad.language.clone());
            verticals.insert(ad.vertical.clone());
            media_types.insert(ad.media_type.as_ref().to_string());
        }

        Ok(FilterOptions {
            platforms: platforms.into_iter().collect(),
            countries: countries.into_iter().collect(),
            languages: languages.into_iter().collect(),
            verticals: verticals.into_iter().collect(),
            media_types: media_types.into_iter().collect(),
        })
    }

    pub async fn count(&self) -> Result<u64> {
        self.repo.count().await
    }
}
