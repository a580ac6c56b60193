//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. This module provides a `DatabasePool`
//! with a multi-connection reader pool for concurrent reads and a single-connection
//! writer pool for serialized writes. The single writer is also what keeps
//! message ids strictly increasing in commit order.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Split read/write pool for SQLite.
///
/// - `reader`: Multi-connection pool (up to 8) for concurrent SELECT queries.
/// - `writer`: Single-connection pool for serialized INSERT/DELETE.
///
/// For in-memory databases both handles point at the same single
/// connection, since separate connections would see separate databases.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open the database, creating the file if needed, and run migrations
    /// on the writer before the reader pool is opened.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        if is_in_memory(database_url) {
            let opts = SqliteConnectOptions::from_str(database_url)?;
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(opts)
                .await?;
            sqlx::migrate!("../../migrations").run(&pool).await?;
            return Ok(Self {
                reader: pool.clone(),
                writer: pool,
            });
        }

        let base_opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let read_opts = base_opts.clone().read_only(true);
        let write_opts = base_opts;

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(write_opts)
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(read_opts)
            .await?;

        Ok(Self { reader, writer })
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Returns the database URL: `DATABASE_URL` when set and non-empty,
/// otherwise `chat_history.db` inside `data_dir`.
pub fn database_url(env_override: Option<String>, data_dir: &Path) -> String {
    match env_override {
        Some(url) if !url.trim().is_empty() => url,
        _ => format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("chat_history.db").display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pool_creates_tables() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());

        let pool = DatabasePool::new(&url).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert_eq!(table_names, vec!["chat_messages"]);
    }

    #[tokio::test]
    async fn test_pool_wal_mode() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test_wal.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());

        let pool = DatabasePool::new(&url).await.unwrap();

        let result: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();

        assert_eq!(result.0.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_in_memory_pool_shares_one_database() {
        let pool = DatabasePool::new("sqlite::memory:").await.unwrap();

        sqlx::query(
            "INSERT INTO chat_messages (conversation_id, role, content, created_at) VALUES (NULL, 'user', 'hi', '2025-01-01T00:00:00.000000Z')",
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_messages")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[test]
    fn test_database_url_default() {
        let url = database_url(None, Path::new("/tmp/relay"));
        assert!(url.starts_with("sqlite://"));
        assert!(url.contains("chat_history.db"));
    }

    #[test]
    fn test_database_url_env_override() {
        let url = database_url(Some("sqlite://other.db".to_string()), Path::new("/tmp/relay"));
        assert_eq!(url, "sqlite://other.db");

        let blank = database_url(Some("  ".to_string()), Path::new("/tmp/relay"));
        assert!(blank.contains("chat_history.db"));
    }
}
