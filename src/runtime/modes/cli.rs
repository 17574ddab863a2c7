//! One-shot CLI commands

use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::config::{StaticConfig, StorageBackend};
use crate::storage::{StorageFactory, seed};

/// Print a sample configuration, or write it to `output_path`
pub fn generate_config(output_path: Option<String>, force: bool) -> Result<()> {
    let config = StaticConfig::default();

    let Some(path) = output_path else {
        print!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if !force && Path::new(&path).exists() {
        bail!("{} already exists, pass --force to overwrite", path);
    }

    config
        .save_to_file(&path)
        .with_context(|| format!("Unable to write configuration file {}", path))?;
    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}

/// Upsert the bundled fixture into the configured backend
pub async fn run_seed() -> Result<()> {
    let config = crate::config::get_config();
    if config.database.backend == StorageBackend::Memory {
        println!(
            "{}",
            "database.backend is memory; seeded data will not outlive this process".yellow()
        );
    }

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    let written = seed::seed(storage.ads.as_ref())
        .await
        .context("Failed to seed ad catalogue")?;

    if let Some(db) = storage.db {
        db.close().await.context("Failed to close database")?;
    }

    println!(
        "  {} {} {}",
        "Seeded".green(),
        written.to_string().blue(),
        format!("ads into {}", storage.info.storage_type).green()
    );
    Ok(())
}
