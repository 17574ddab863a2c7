//! Bundled sample catalogue
//!
//! `fixtures/ads.json` is compiled into the binary and loaded into empty
//! stores at startup or by `adscope seed`.

use rust_embed::Embed;
use tracing::info;

use super::{Ad, AdRepository};
use crate::errors::{AdscopeError, Result};

#[derive(Embed)]
#[folder = "fixtures/"]
struct Fixtures;

const ADS_FIXTURE: &str = "ads.json";

/// Parse the bundled ad fixture
pub fn fixture_ads() -> Result<Vec<Ad>> {
    let file = Fixtures::get(ADS_FIXTURE)
        .ok_or_else(|| AdscopeError::file_operation(format!("missing fixture {}", ADS_FIXTURE)))?;
    let ads: Vec<Ad> = serde_json::from_slice(&file.data)?;
    Ok(ads)
}

/// Load the fixture unless the repository already holds ads.
///
/// Returns the number of ads written.
pub async fn seed_if_empty(repo: &dyn AdRepository) -> Result<usize> {
    let existing = repo.count().await?;
    if existing > 0 {
        info!("Ad catalogue already has {} rows, skipping seed", existing);
        return Ok(0);
    }
    seed(repo).await
}

/// Upsert every fixture ad
pub async fn seed(repo: &dyn AdRepository) -> Result<usize> {
    let ads = fixture_ads()?;
    let written = repo.insert_many(ads).await?;
    info!("Seeded {} ads from bundled fixture", written);
    Ok(written)
}
