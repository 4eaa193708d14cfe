//! Repository for the `notifications` table.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::models::enums::NotificationType;
use crate::models::notification::{CreateNotification, Notification};

const COLUMNS: &str =
    "id, user_id, message, type, is_read, related_id, related_type, created_at, updated_at";

pub struct NotificationRepo;

impl NotificationRepo {
    /// Create an unread notification for a user.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, message, type, related_id, related_type)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.user_id)
            .bind(&input.message)
            .bind(input.kind.unwrap_or(NotificationType::Info))
            .bind(input.related_id)
            .bind(&input.related_type)
            .fetch_one(pool)
            .await
    }

    /// Unread notifications for a user, newest first.
    pub async fn list_unread(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE user_id = $1 AND is_read = false
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Mark one notification read. Scoped to the owner.
    pub async fn mark_read(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true
             WHERE id = $1 AND user_id = $2 AND is_read = false",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns the number of notifications updated.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
