// Document store for swap records

use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

pub mod database;
pub mod swaps;

pub use database::Database;

pub fn prepare_sqlite_url(url: &str) -> String {
    if url.starts_with("sqlite:") && !url.contains("mode=") && !url.contains(":memory:") {
        if url.contains('?') {
            format!("{url}&mode=rwc")
        } else {
            format!("{url}?mode=rwc")
        }
    } else {
        url.to_string()
    }
}

pub async fn connect_db(db_url: &str, max_connections: u32) -> Result<Pool<Sqlite>> {
    tracing::debug!(db_url = %db_url, max_connections, "Connecting to database");
    Ok(SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(db_url)
        .await?)
}

/// Apply the embedded schema migrations.
pub async fn migrate(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
