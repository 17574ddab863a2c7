//! Query pipeline tests over the bundled fixture

mod common;

use adscope::query::{AdQuery, PageLimits, PageRequest, SortKey, paginate, query_ads};
use adscope::storage::{Platform, seed::fixture_ads};
use common::make_ad;

fn query() -> AdQuery {
    AdQuery::default()
}

#[test]
fn test_every_item_satisfies_filters_and_search() {
    let ads = fixture_ads().unwrap();
    let q = AdQuery {
        country: Some("US".to_string()),
        search: Some("SNACK".to_string()),
        page_size: Some(100),
        ..query()
    };
    let page = query_ads(ads, &q, PageLimits::default());

    assert!(page.total > 0);
    for ad in &page.items {
        assert_eq!(ad.country, "US");
        let haystack = format!("{} {} {}", ad.headline, ad.body_text, ad.advertiser_name)
            .to_lowercase();
        assert!(haystack.contains("snack"));
    }
}

#[test]
fn test_filters_are_exact_and_case_sensitive() {
    let ads = fixture_ads().unwrap();
    let lower = AdQuery {
        country: Some("us".to_string()),
        ..query()
    };
    assert_eq!(query_ads(ads.clone(), &lower, PageLimits::default()).total, 0);

    let unknown = AdQuery {
        platform: Some("myspace".to_string()),
        ..query()
    };
    let page = query_ads(ads, &unknown, PageLimits::default());
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
    assert!(page.items.is_empty());
}

#[test]
fn test_empty_filter_values_are_ignored() {
    let ads = fixture_ads().unwrap();
    let total = ads.len();
    let q = AdQuery {
        platform: Some(String::new()),
        search: Some(String::new()),
        page_size: Some(100),
        ..query()
    };
    assert_eq!(query_ads(ads, &q, PageLimits::default()).total, total);
}

#[test]
fn test_total_pages_and_page_bounds() {
    let ads = fixture_ads().unwrap();
    let total = ads.len();
    let q = AdQuery {
        page_size: Some(5),
        page: Some(2),
        ..query()
    };
    let page = query_ads(ads, &q, PageLimits::default());
    assert_eq!(page.total, total);
    assert_eq!(page.total_pages, total.div_ceil(5));
    assert!(page.items.len() <= 5);
    assert_eq!(page.page, 2);

    let beyond = AdQuery {
        page_size: Some(5),
        page: Some(99),
        ..query()
    };
    let page = query_ads(fixture_ads().unwrap(), &beyond, PageLimits::default());
    assert!(page.items.is_empty());
    assert_eq!(page.total, total);
}

#[test]
fn test_latest_is_non_increasing() {
    let q = AdQuery {
        sort: Some("latest".to_string()),
        page_size: Some(100),
        ..query()
    };
    let page = query_ads(fixture_ads().unwrap(), &q, PageLimits::default());
    assert!(
        page.items
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at)
    );
}

#[test]
fn test_hot_is_non_increasing_and_default() {
    let q = AdQuery {
        page_size: Some(100),
        ..query()
    };
    let page = query_ads(fixture_ads().unwrap(), &q, PageLimits::default());
    assert!(
        page.items
            .windows(2)
            .all(|w| w[0].hot_score() >= w[1].hot_score())
    );
    assert_eq!(page.items[0].id, "ad-tt-0002");
}

#[test]
fn test_engagement_sorts_by_interaction_total() {
    let ads = vec![
        make_ad("e1", Platform::Tiktok, 10, 0, 0),
        make_ad("e2", Platform::Tiktok, 1, 2, 3),
        make_ad("e3", Platform::Tiktok, 5, 5, 5),
        make_ad("e4", Platform::Tiktok, 0, 0, 40),
    ];
    let q = AdQuery {
        sort: Some("engagement".to_string()),
        ..query()
    };
    let page = query_ads(ads, &q, PageLimits::default());
    let ids: Vec<_> = page.items.iter().map(|a| a.id.as_str()).collect();
    // hot 排序会是 e4, e3, e2, e1
    assert_eq!(ids, vec!["e4", "e3", "e1", "e2"]);

    let fixture = query_ads(
        fixture_ads().unwrap(),
        &AdQuery {
            sort: Some("engagement".to_string()),
            page_size: Some(100),
            ..query()
        },
        PageLimits::default(),
    );
    assert!(
        fixture
            .items
            .windows(2)
            .all(|w| w[0].engagement() >= w[1].engagement())
    );
}

#[test]
fn test_cvr_treats_missing_as_zero() {
    let mut a = make_ad("a", Platform::Youtube, 0, 0, 0);
    a.predicted_cvr = Some(0.01);
    let b = make_ad("b", Platform::Youtube, 0, 0, 0);
    let mut c = make_ad("c", Platform::Youtube, 0, 0, 0);
    c.predicted_cvr = Some(0.05);
    let mut d = make_ad("d", Platform::Youtube, 0, 0, 0);
    d.predicted_cvr = Some(0.0);

    let q = AdQuery {
        sort: Some("cvr".to_string()),
        ..query()
    };
    let page = query_ads(vec![a, b, c, d], &q, PageLimits::default());
    let ids: Vec<_> = page.items.iter().map(|a| a.id.as_str()).collect();
    // b (缺失) 与 d (0.0) 并列，保持输入顺序
    assert_eq!(ids, vec!["c", "a", "b", "d"]);

    let fixture = query_ads(
        fixture_ads().unwrap(),
        &AdQuery {
            sort: Some("cvr".to_string()),
            page_size: Some(100),
            ..query()
        },
        PageLimits::default(),
    );
    let cvrs: Vec<f64> = fixture
        .items
        .iter()
        .map(|a| a.predicted_cvr.unwrap_or(0.0))
        .collect();
    assert!(cvrs.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(cvrs.last().copied(), Some(0.0));
}

#[test]
fn test_unknown_sort_falls_back_to_hot() {
    assert_eq!(SortKey::from_param(Some("random")), SortKey::Hot);
    let ads = fixture_ads().unwrap();
    let hot = query_ads(
        ads.clone(),
        &AdQuery {
            sort: Some("hot".to_string()),
            ..query()
        },
        PageLimits::default(),
    );
    let unknown = query_ads(
        ads,
        &AdQuery {
            sort: Some("random".to_string()),
            ..query()
        },
        PageLimits::default(),
    );
    let ids = |p: &adscope::query::Page<adscope::storage::Ad>| {
        p.items.iter().map(|a| a.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(&hot), ids(&unknown));
}

#[test]
fn test_hot_score_example() {
    let mut a = make_ad("A", Platform::Facebook, 100, 10, 5);
    a.predicted_ctr = Some(2.0);
    let b = make_ad("B", Platform::Facebook, 50, 50, 50);
    assert_eq!(a.hot_score(), 170.0);
    assert_eq!(b.hot_score(), 275.0);

    let page = query_ads(vec![a, b], &query(), PageLimits::default());
    assert_eq!(page.items[0].id, "B");
    assert_eq!(page.items[1].id, "A");
}

#[test]
fn test_page_size_clamping() {
    let limits = PageLimits {
        default_page_size: 20,
        max_page_size: 50,
    };
    assert_eq!(PageRequest::resolve(Some(0), Some(0), limits).page, 1);
    assert_eq!(PageRequest::resolve(None, Some(-3), limits).page_size, 20);
    assert_eq!(PageRequest::resolve(None, Some(1000), limits).page_size, 50);

    let page = paginate((0..7).collect::<Vec<_>>(), PageRequest::resolve(Some(2), Some(3), limits));
    assert_eq!(page.items, vec![3, 4, 5]);
    assert_eq!(page.total_pages, 3);
}
