//! Repository for the `direct_messages` table.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::models::direct_message::{CreateDirectMessage, DirectMessage};

const COLUMNS: &str =
    "id, content, sender_id, receiver_id, is_read, read_at, created_at, updated_at";

pub struct DirectMessageRepo;

impl DirectMessageRepo {
    /// Send a direct message, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDirectMessage,
    ) -> Result<DirectMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO direct_messages (content, sender_id, receiver_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DirectMessage>(&query)
            .bind(&input.content)
            .bind(input.sender_id)
            .bind(input.receiver_id)
            .fetch_one(pool)
            .await
    }

    /// Every message exchanged between two users in either direction,
    /// oldest first.
    pub async fn conversation(
        pool: &PgPool,
        user_a: DbId,
        user_b: DbId,
    ) -> Result<Vec<DirectMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM direct_messages
             WHERE (sender_id = $1 AND receiver_id = $2)
                OR (sender_id = $2 AND receiver_id = $1)
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, DirectMessage>(&query)
            .bind(user_a)
            .bind(user_b)
            .fetch_all(pool)
            .await
    }

    /// Mark every unread message from `sender_id` to `receiver_id` as read.
    ///
    /// Returns the number of messages updated.
    pub async fn mark_read(
        pool: &PgPool,
        receiver_id: DbId,
        sender_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE direct_messages SET is_read = true, read_at = NOW()
             WHERE receiver_id = $1 AND sender_id = $2 AND is_read = false",
        )
        .bind(receiver_id)
        .bind(sender_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count unread messages addressed to a user.
    pub async fn count_unread(pool: &PgPool, receiver_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM direct_messages WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(receiver_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
