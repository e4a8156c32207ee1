//! Database access for filmlog
//!
//! One SQLite table, `films`, keyed by `(user_id, name)`.

pub mod films;

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to the SQLite file at `db_path`, creating parent directories
/// and the schema as needed.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the films table if it doesn't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS films (
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            rating REAL,
            year INTEGER,
            genre TEXT,
            description TEXT,
            tag TEXT,
            review TEXT,
            poster_url TEXT,
            trailer TEXT,
            PRIMARY KEY (user_id, name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (films)");

    Ok(())
}
