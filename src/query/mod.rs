//! Collection query pipeline
//!
//! Filter, sort and paginate an in-memory collection. Listing endpoints
//! load their records from a repository and run them through here.

mod ads;

pub use ads::{AdQuery, SortKey, matches_filters, query_ads, sort_ads};

use serde::{Deserialize, Deserializer, Serialize};

/// Bounds applied to client supplied pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl PageLimits {
    pub fn from_config() -> Self {
        let config = crate::config::get_config();
        Self {
            default_page_size: config.query.default_page_size.max(1),
            max_page_size: config.query.max_page_size.max(1),
        }
    }
}

/// Effective, already clamped page selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    /// Clamp raw client values.
    ///
    /// - `page` missing or < 1 becomes 1
    /// - `page_size` missing or < 1 becomes the default
    /// - `page_size` above the maximum is capped
    pub fn resolve(page: Option<i64>, page_size: Option<i64>, limits: PageLimits) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p as usize,
            _ => 1,
        };
        let page_size = match page_size {
            Some(s) if s >= 1 => (s as usize).min(limits.max_page_size),
            _ => limits.default_page_size.min(limits.max_page_size),
        };
        Self { page, page_size }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// One page of results plus pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Slice an already filtered and ordered collection
pub fn paginate<T>(mut items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let total_pages = total.div_ceil(request.page_size);
    let start = request.offset();

    let items = if start < total {
        let end = start.saturating_add(request.page_size).min(total);
        items.drain(start..end).collect()
    } else {
        Vec::new()
    };

    Page {
        items,
        page: request.page,
        page_size: request.page_size,
        total,
        total_pages,
    }
}

/// Accepts "3", " 3 " or garbage; garbage becomes `None`.
///
/// Query strings always arrive as text, so pagination must not turn a typo
/// into a 400.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<i64>().ok()))
}

/// Treat empty strings as absent
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
