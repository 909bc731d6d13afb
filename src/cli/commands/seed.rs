use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::{DatabaseConfig, SecurityConfig, SeedConfig};
use crate::database::DatabaseManager;
use crate::seed::{seed_admin, seed_sample_topics};

pub async fn handle(sample_topics: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    let database = DatabaseConfig::from_env()?;
    // Same cost the server hashes with
    let cost = SecurityConfig::bcrypt_cost_from_env()?;
    if database.url.starts_with("memory:") {
        tracing::warn!("DATABASE_URL is memory://; seeded rows vanish when this command exits");
    }

    let store = DatabaseManager::connect(&database).await?;
    let seed = SeedConfig::from_env();
    let admin = seed_admin(store.as_ref(), &seed, cost).await?;

    let inserted = if sample_topics {
        seed_sample_topics(store.as_ref()).await?
    } else {
        0
    };

    output_success(
        &output_format,
        &format!("Admin '{}' ready; {} sample topics inserted", admin.username, inserted),
        Some(json!({
            "admin": admin.username,
            "sample_topics": inserted,
        })),
    )
}
