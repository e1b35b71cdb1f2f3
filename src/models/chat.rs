// src/models/chat.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_CONVERSATION_LIMIT: i64 = 200;
pub const MAX_CONVERSATION_LIMIT: i64 = 2000;
pub const DEFAULT_SENT_LIMIT: i64 = 100;
pub const MAX_SENT_LIMIT: i64 = 1000;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub receiver_id: Uuid,
    #[validate(length(max = 5000))]
    pub content: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MessageLimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkReadResult {
    pub modified: u64,
}

pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.filter(|l| *l >= 1).unwrap_or(default).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(None, DEFAULT_CONVERSATION_LIMIT, MAX_CONVERSATION_LIMIT), 200);
        assert_eq!(clamp_limit(Some(5000), DEFAULT_CONVERSATION_LIMIT, MAX_CONVERSATION_LIMIT), 2000);
        assert_eq!(clamp_limit(Some(0), DEFAULT_SENT_LIMIT, MAX_SENT_LIMIT), 100);
        assert_eq!(clamp_limit(Some(42), DEFAULT_SENT_LIMIT, MAX_SENT_LIMIT), 42);
    }
}
