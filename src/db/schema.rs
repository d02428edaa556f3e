use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};

// No ON DELETE CASCADE on the foreign keys: `services::photos::delete_photo`
// removes a photo's comments and likes inside its own transaction.
const MYSQL_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        email VARCHAR(255) UNIQUE NOT NULL,
        username VARCHAR(255) UNIQUE NOT NULL,
        password_hash VARCHAR(255) NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS photos (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        user_id BIGINT NOT NULL,
        image VARCHAR(2048) NOT NULL,
        caption TEXT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (user_id) REFERENCES users(id),
        INDEX idx_photos_user_id (user_id),
        INDEX idx_photos_created_at (created_at)
    );

    CREATE TABLE IF NOT EXISTS comments (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        photo_id BIGINT NOT NULL,
        user_id BIGINT NOT NULL,
        body TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (photo_id) REFERENCES photos(id),
        FOREIGN KEY (user_id) REFERENCES users(id),
        INDEX idx_comments_photo_id (photo_id)
    );

    CREATE TABLE IF NOT EXISTS likes (
        id BIGINT AUTO_INCREMENT PRIMARY KEY,
        photo_id BIGINT NOT NULL,
        user_id BIGINT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE KEY unique_like_user_photo (user_id, photo_id),
        FOREIGN KEY (photo_id) REFERENCES photos(id),
        FOREIGN KEY (user_id) REFERENCES users(id),
        INDEX idx_likes_photo_id (photo_id)
    );
"#;

const SQLITE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS photos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        image TEXT NOT NULL,
        caption TEXT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_photos_user_id ON photos (user_id);

    CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        photo_id INTEGER NOT NULL REFERENCES photos(id),
        user_id INTEGER NOT NULL REFERENCES users(id),
        body TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_comments_photo_id ON comments (photo_id);

    CREATE TABLE IF NOT EXISTS likes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        photo_id INTEGER NOT NULL REFERENCES photos(id),
        user_id INTEGER NOT NULL REFERENCES users(id),
        created_at TEXT NOT NULL
    );

    CREATE UNIQUE INDEX IF NOT EXISTS unique_like_user_photo ON likes (user_id, photo_id);
    CREATE INDEX IF NOT EXISTS idx_likes_photo_id ON likes (photo_id);
"#;

/// Creates the four tables if they do not exist yet, using the dialect of
/// the connected backend.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), anyhow::Error> {
    let backend = db.get_database_backend();
    let sql = match backend {
        DatabaseBackend::MySql => MYSQL_SCHEMA,
        DatabaseBackend::Sqlite => SQLITE_SCHEMA,
        DatabaseBackend::Postgres => {
            return Err(anyhow::anyhow!("PostgreSQL is not a supported backend"));
        }
    };

    for statement in sql.split(';') {
        let statement = statement.trim();
        if !statement.is_empty() {
            let stmt = Statement::from_string(backend, statement.to_string());
            db.execute(stmt).await?;
        }
    }

    log::info!("Database schema ready ({:?})", backend);
    Ok(())
}
