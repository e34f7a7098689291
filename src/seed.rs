use anyhow::Context;
use core_types::{EducationalContent, Product};
use database::DbRepository;
use serde::Deserialize;
use std::path::Path;

/// The starter catalogue shipped with the binary.
const BUNDLED_SEED: &str = include_str!("../seed/seed_data.json");

#[derive(Debug, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub educational: Vec<EducationalContent>,
}

/// How many records made it into the store, and how many were skipped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub products_added: usize,
    pub products_failed: usize,
    pub educational_added: usize,
    pub educational_failed: usize,
}

impl SeedData {
    pub fn bundled() -> anyhow::Result<Self> {
        serde_json::from_str(BUNDLED_SEED).context("Bundled seed data is malformed")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read seed file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Seed file {} is malformed", path.display()))
    }
}

/// Inserts every record in `data`. A failed insert is logged and skipped so the
/// rest of the batch still lands.
pub async fn run(repo: &DbRepository, data: SeedData) -> SeedReport {
    tracing::info!("Seeding database with initial data...");
    let mut report = SeedReport::default();

    for product in data.products {
        let label = format!("{} - {}", product.bank, product.name);
        match repo.add_product(product).await {
            Ok(_) => {
                tracing::info!(product = %label, "Added product.");
                report.products_added += 1;
            }
            Err(e) => {
                tracing::error!(product = %label, error = %e, "Error adding product.");
                report.products_failed += 1;
            }
        }
    }

    for item in data.educational {
        let title = item.title.clone();
        match repo.add_educational_content(item).await {
            Ok(_) => {
                tracing::info!(%title, "Added educational content.");
                report.educational_added += 1;
            }
            Err(e) => {
                tracing::error!(%title, error = %e, "Error adding educational content.");
                report.educational_failed += 1;
            }
        }
    }

    tracing::info!(?report, "Database seeding complete!");
    report
}
