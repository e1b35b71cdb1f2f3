// src/services/chat_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AccountRepository, ChatRepository},
    models::chat::{
        clamp_limit, MarkReadResult, Message, DEFAULT_CONVERSATION_LIMIT, DEFAULT_SENT_LIMIT,
        MAX_CONVERSATION_LIMIT, MAX_SENT_LIMIT,
    },
};

#[derive(Clone)]
pub struct ChatService {
    repo: ChatRepository,
    account_repo: AccountRepository,
    pool: PgPool,
}

impl ChatService {
    pub fn new(repo: ChatRepository, account_repo: AccountRepository, pool: PgPool) -> Self {
        Self {
            repo,
            account_repo,
            pool,
        }
    }

    pub async fn send(&self, sender_id: Uuid, receiver_id: Uuid, content: &str) -> Result<Message, AppError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::BadRequest("Message content is required".to_string()));
        }

        self.account_repo
            .find_active_by_id(&self.pool, receiver_id)
            .await?
            .ok_or(AppError::ReceiverNotFound)?;

        let message = self.repo.insert(sender_id, receiver_id, content).await?;
        tracing::debug!(message_id = %message.id, "Mensagem enviada");
        Ok(message)
    }

    pub async fn conversation(&self, me: Uuid, other: Uuid, limit: Option<i64>) -> Result<Vec<Message>, AppError> {
        let limit = clamp_limit(limit, DEFAULT_CONVERSATION_LIMIT, MAX_CONVERSATION_LIMIT);
        self.repo.conversation(me, other, limit).await
    }

    pub async fn sent(&self, me: Uuid, limit: Option<i64>) -> Result<Vec<Message>, AppError> {
        let limit = clamp_limit(limit, DEFAULT_SENT_LIMIT, MAX_SENT_LIMIT);
        self.repo.sent_by(me, limit).await
    }

    pub async fn mark_read(&self, me: Uuid, other: Uuid) -> Result<MarkReadResult, AppError> {
        let modified = self.repo.mark_read(me, other).await?;
        Ok(MarkReadResult { modified })
    }
}
