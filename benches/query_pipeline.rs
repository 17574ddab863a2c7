//! Query pipeline benchmarks
//!
//! Filters, sorts and paginates a synthetic catalogue of 10k ads.

use std::collections::BTreeSet;
use std::hint::black_box;

use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};

use adscope::query::{AdQuery, PageLimits, query_ads};
use adscope::storage::{Ad, MediaType, Platform, SpendBracket};

const PLATFORMS: [Platform; 4] = [
    Platform::Facebook,
    Platform::Tiktok,
    Platform::Instagram,
    Platform::Youtube,
];
const COUNTRIES: [&str; 5] = ["US", "GB", "DE", "ID", "BR"];

fn catalogue(n: usize) -> Vec<Ad> {
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let created = base + Duration::minutes(i as i64 * 7);
            Ad {
                id: format!("ad-{:05}", i),
                platform: PLATFORMS[i % PLATFORMS.len()],
                advertiser_name: format!("Brand {}", i % 97),
                headline: format!("Limited offer number {}", i),
                body_text: "Shop the new collection today".to_string(),
                media_type: if i % 3 == 0 {
                    MediaType::Image
                } else {
                    MediaType::Video
                },
                media_urls: Vec::new(),
                cta_label: Some("Shop now".to_string()),
                landing_url: None,
                country: COUNTRIES[i % COUNTRIES.len()].to_string(),
                language: "en".to_string(),
                created_at: created,
                first_seen_at: created,
                last_seen_at: created,
                est_impressions: (i as u64 * 131) % 100_000,
                spend_bracket: SpendBracket::Medium,
                likes: (i as u64 * 37) % 5_000,
                comments: (i as u64 * 13) % 800,
                shares: (i as u64 * 7) % 400,
                predicted_ctr: (i % 4 != 0).then(|| (i % 30) as f64 / 10.0),
                predicted_cvr: None,
                vertical: if i % 2 == 0 { "beauty" } else { "food" }.to_string(),
                tags: BTreeSet::new(),
            }
        })
        .collect()
}

fn bench_query_pipeline(c: &mut Criterion) {
    let ads = catalogue(10_000);
    let limits = PageLimits::default();
    let mut group = c.benchmark_group("query_pipeline");

    let hot = AdQuery::default();
    group.bench_function("hot_unfiltered", |b| {
        b.iter(|| query_ads(black_box(ads.clone()), &hot, limits))
    });

    let filtered = AdQuery {
        platform: Some("tiktok".to_string()),
        country: Some("US".to_string()),
        sort: Some("latest".to_string()),
        ..AdQuery::default()
    };
    group.bench_function("filtered_latest", |b| {
        b.iter(|| query_ads(black_box(ads.clone()), &filtered, limits))
    });

    let search = AdQuery {
        search: Some("OFFER NUMBER 99".to_string()),
        sort: Some("engagement".to_string()),
        ..AdQuery::default()
    };
    group.bench_function("search_engagement", |b| {
        b.iter(|| query_ads(black_box(ads.clone()), &search, limits))
    });

    group.finish();
}

criterion_group!(benches, bench_query_pipeline);
criterion_main!(benches);
