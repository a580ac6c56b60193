//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `relay-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, writes on the
//! single-connection writer and reads on the reader pool.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use relay_core::chat::repository::MessageRepository;
use relay_types::chat::{ConversationSummary, Role, StoredMessage};
use relay_types::error::StorageError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct MessageRow {
    id: i64,
    conversation_id: Option<String>,
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<StoredMessage, StorageError> {
        Ok(StoredMessage {
            id: self.id,
            conversation_id: self.conversation_id,
            role: parse_role(&self.role)?,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct SummaryRow {
    conversation_id: String,
    role: String,
    content: String,
    created_at: String,
    count: i64,
}

impl SummaryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            conversation_id: row.try_get("conversation_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            count: row.try_get("cnt")?,
        })
    }

    fn into_summary(self) -> Result<ConversationSummary, StorageError> {
        Ok(ConversationSummary {
            conversation_id: self.conversation_id,
            last_role: parse_role(&self.role)?,
            last_message: self.content,
            last_time: parse_datetime(&self.created_at)?,
            count: self.count as u64,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_role(s: &str) -> Result<Role, StorageError> {
    s.parse().map_err(StorageError::Query)
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so that `ORDER BY created_at` sorts chronologically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageError::Connection(err.to_string())
        }
        other => StorageError::Query(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// MessageRepository implementation
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn save(
        &self,
        role: Role,
        content: &str,
        conversation_id: Option<&str>,
    ) -> Result<StoredMessage, StorageError> {
        if content.is_empty() {
            return Err(StorageError::InvalidMessage(
                "content must not be empty".to_string(),
            ));
        }

        // Stored at microsecond precision; truncate so the returned row
        // matches what a later read produces.
        let created_at = Utc::now().trunc_subsecs(6);

        let result = sqlx::query(
            "INSERT INTO chat_messages (conversation_id, role, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(conversation_id)
        .bind(role.to_string())
        .bind(content)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(StoredMessage {
            id: result.last_insert_rowid(),
            conversation_id: conversation_id.map(str::to_string),
            role,
            content: content.to_string(),
            created_at,
        })
    }

    async fn fetch_history(
        &self,
        conversation_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<StoredMessage>, StorageError> {
        let mut sql = String::from(
            "SELECT id, conversation_id, role, content, created_at FROM chat_messages",
        );
        if conversation_id.is_some() {
            sql.push_str(" WHERE conversation_id = ?");
        }
        sql.push_str(" ORDER BY id ASC LIMIT ?");

        let mut query = sqlx::query(&sql);
        if let Some(cid) = conversation_id {
            query = query.bind(cid);
        }

        let rows = query
            .bind(i64::from(limit))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row = MessageRow::from_row(row).map_err(map_sqlx_error)?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn clear_history(&self, conversation_id: Option<&str>) -> Result<u64, StorageError> {
        let result = match conversation_id {
            Some(cid) => {
                sqlx::query("DELETE FROM chat_messages WHERE conversation_id = ?")
                    .bind(cid)
                    .execute(&self.pool.writer)
                    .await
            }
            None => {
                sqlx::query("DELETE FROM chat_messages")
                    .execute(&self.pool.writer)
                    .await
            }
        }
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn list_conversations(
        &self,
        limit: u32,
    ) -> Result<Vec<ConversationSummary>, StorageError> {
        let rows = sqlx::query(
            r#"SELECT m.conversation_id, m.role, m.content, m.created_at, s.cnt
               FROM chat_messages m
               JOIN (
                   SELECT conversation_id, MAX(id) AS max_id, COUNT(*) AS cnt
                   FROM chat_messages
                   WHERE conversation_id IS NOT NULL
                   GROUP BY conversation_id
               ) s ON m.id = s.max_id
               ORDER BY m.created_at DESC, m.id DESC
               LIMIT ?"#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let summary_row = SummaryRow::from_row(row).map_err(map_sqlx_error)?;
            summaries.push(summary_row.into_summary()?);
        }

        Ok(summaries)
    }

    async fn count_messages(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM chat_messages")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        let count: i64 = row.try_get("cnt").map_err(map_sqlx_error)?;

        Ok(count as u64)
    }
}
