use thiserror::Error;
use tracing::info;

use crate::auth::{hash_password, AuthError};
use crate::config::SeedConfig;
use crate::database::models::{Admin, NewRoadmap};
use crate::database::{DatabaseError, Store};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Admin username must not be empty")]
    EmptyUsername,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Upsert the configured admin. Safe to run repeatedly: the second run finds
/// the row and leaves its password hash alone.
pub async fn seed_admin(store: &dyn Store, config: &SeedConfig, cost: u32) -> Result<Admin, SeedError> {
    let username = config.admin_username.trim();
    if username.is_empty() {
        return Err(SeedError::EmptyUsername);
    }

    let password_hash = hash_password(&config.admin_password, cost).await?;
    let admin = store.upsert_admin(username, &password_hash).await?;

    info!("Admin '{}' is present", admin.username);
    Ok(admin)
}

/// Topics with a couple of roadmap links each, for local development.
fn sample_topics() -> Vec<(&'static str, Vec<NewRoadmap>)> {
    vec![
        (
            "Rust",
            vec![
                NewRoadmap::new("The Rust Book", "https://doc.rust-lang.org/book/"),
                NewRoadmap::new("Rust by Example", "https://doc.rust-lang.org/rust-by-example/"),
            ],
        ),
        (
            "PostgreSQL",
            vec![NewRoadmap::new(
                "PostgreSQL Tutorial",
                "https://www.postgresql.org/docs/current/tutorial.html",
            )],
        ),
        (
            "Web Fundamentals",
            vec![
                NewRoadmap::new("MDN: HTTP", "https://developer.mozilla.org/en-US/docs/Web/HTTP"),
                NewRoadmap::new("MDN: HTML", "https://developer.mozilla.org/en-US/docs/Web/HTML"),
            ],
        ),
    ]
}

/// Insert the sample topics when the topic table is empty. Returns how many were inserted.
pub async fn seed_sample_topics(store: &dyn Store) -> Result<usize, SeedError> {
    if !store.list_topics().await?.is_empty() {
        info!("Topics already present, skipping samples");
        return Ok(0);
    }

    let topics = sample_topics();
    for (name, roadmaps) in &topics {
        store.insert_topic(name, roadmaps).await?;
    }

    info!("Inserted {} sample topics", topics.len());
    Ok(topics.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::database::MemoryStore;

    fn seed_config() -> SeedConfig {
        SeedConfig {
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
        }
    }

    #[tokio::test]
    async fn seeding_twice_leaves_one_admin() {
        let store = MemoryStore::new();

        let first = seed_admin(&store, &seed_config(), 4).await.unwrap();
        let second = seed_admin(&store, &seed_config(), 4).await.unwrap();

        assert_eq!(store.admin_count().await, 1);
        assert_eq!(first.id, second.id);
        assert_eq!(first.password_hash, second.password_hash);
    }

    #[tokio::test]
    async fn seeded_password_verifies() {
        let store = MemoryStore::new();
        seed_admin(&store, &seed_config(), 4).await.unwrap();

        let admin = store.find_admin("admin").await.unwrap().unwrap();
        assert!(verify_password("admin", &admin.password_hash).await.unwrap());
        assert!(!verify_password("wrong", &admin.password_hash).await.unwrap());
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let store = MemoryStore::new();
        let config = SeedConfig {
            admin_username: "  ".to_string(),
            admin_password: "admin".to_string(),
        };
        assert!(matches!(
            seed_admin(&store, &config, 4).await,
            Err(SeedError::EmptyUsername)
        ));
    }

    #[tokio::test]
    async fn sample_topics_only_fill_an_empty_table() {
        let store = MemoryStore::new();

        assert_eq!(seed_sample_topics(&store).await.unwrap(), 3);
        assert_eq!(seed_sample_topics(&store).await.unwrap(), 0);
        assert_eq!(store.list_topics().await.unwrap().len(), 3);
    }
}
