//! Repository for the `messages` table.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::error::DbError;
use crate::models::message::{CreateMessage, Message, MessageWithSender};
use crate::schema::{registry, JoinKind};

const COLUMNS: &str = "id, content, room_id, sender_id, is_system, created_at, updated_at";

pub struct MessageRepo;

impl MessageRepo {
    /// Post a room message, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (content, room_id, sender_id, is_system)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(&input.content)
            .bind(input.room_id)
            .bind(input.sender_id)
            .bind(input.is_system.unwrap_or(false))
            .fetch_one(pool)
            .await
    }

    /// Find a room message by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Message>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM messages WHERE id = $1");
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The latest `limit` messages of a room with sender names, oldest first.
    pub async fn list_for_room(
        pool: &PgPool,
        room_id: DbId,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, DbError> {
        let join = registry().join("messages", "sender", JoinKind::Inner)?;
        let query = format!(
            "SELECT * FROM (
                SELECT messages.id, messages.content, messages.sender_id,
                       \"sender\".name AS sender_name, messages.is_system, messages.created_at
                FROM messages
                {join}
                WHERE messages.room_id = $1
                ORDER BY messages.created_at DESC, messages.id DESC
                LIMIT $2
             ) latest
             ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, MessageWithSender>(&query)
            .bind(room_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Delete a room message. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id::<Message>(pool, id).await
    }
}
