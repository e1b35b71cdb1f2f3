// src/db/chat_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::chat::Message};

const MESSAGE_COLUMNS: &str = "id, sender_id, receiver_id, content, sent_at, is_read, read_at";

#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, sender_id: Uuid, receiver_id: Uuid, content: &str) -> Result<Message, AppError> {
        let sql = format!(
            "INSERT INTO messages (sender_id, receiver_id, content) VALUES ($1, $2, $3) \
             RETURNING {MESSAGE_COLUMNS}"
        );
        let message = sqlx::query_as::<_, Message>(&sql)
            .bind(sender_id)
            .bind(receiver_id)
            .bind(content)
            .fetch_one(&self.pool)
            .await?;
        Ok(message)
    }

    /// As `limit` mensagens mais recentes entre as duas contas, em ordem cronológica.
    pub async fn conversation(&self, me: Uuid, other: Uuid, limit: i64) -> Result<Vec<Message>, AppError> {
        let sql = format!(
            r#"
            SELECT * FROM (
                SELECT {MESSAGE_COLUMNS} FROM messages
                WHERE (sender_id = $1 AND receiver_id = $2)
                   OR (sender_id = $2 AND receiver_id = $1)
                ORDER BY sent_at DESC
                LIMIT $3
            ) recent
            ORDER BY sent_at ASC
            "#
        );
        let messages = sqlx::query_as::<_, Message>(&sql)
            .bind(me)
            .bind(other)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(messages)
    }

    pub async fn sent_by(&self, sender_id: Uuid, limit: i64) -> Result<Vec<Message>, AppError> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE sender_id = $1 ORDER BY sent_at DESC LIMIT $2"
        );
        let messages = sqlx::query_as::<_, Message>(&sql)
            .bind(sender_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(messages)
    }

    // Marca como lidas as mensagens que `other` enviou para `me`.
    pub async fn mark_read(&self, me: Uuid, other: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE, read_at = NOW() \
             WHERE receiver_id = $1 AND sender_id = $2 AND is_read = FALSE",
        )
        .bind(me)
        .bind(other)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
