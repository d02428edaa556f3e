// Shared fixtures for the integration tests. Every test gets its own SQLite
// database file so tests can run in parallel without seeing each other's rows.
#![allow(dead_code)]

use photogram::config::Config;
use photogram::db::{self, DbPool};
use photogram::entities::{photo, user};
use photogram::services::photos;
use photogram::services::users::{self, NewUser};

pub fn test_config() -> Config {
    let path = std::env::temp_dir().join(format!("photogram-test-{}.db", uuid::Uuid::new_v4()));
    Config::sqlite(path.to_str().expect("temp dir path is not valid UTF-8"))
}

pub async fn test_pool(config: &Config) -> DbPool {
    db::create_db_pool(config)
        .await
        .expect("Failed to create SQLite test pool")
}

pub async fn fresh_pool() -> DbPool {
    test_pool(&test_config()).await
}

/// Inserts a user directly through the store, skipping password hashing.
pub async fn seed_user(db: &DbPool, username: &str) -> user::Model {
    users::create_user(
        db,
        NewUser {
            email: format!("{}@m.com", username),
            username: username.to_string(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .expect("Failed to seed user")
}

pub async fn seed_photo(db: &DbPool, owner: &user::Model, image: &str) -> photo::Model {
    photos::create_photo(db, owner.id, image, None)
        .await
        .expect("Failed to seed photo")
}
