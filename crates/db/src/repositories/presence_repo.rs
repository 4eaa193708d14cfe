//! Repository for the `user_presences` table.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::models::enums::PresenceStatus;
use crate::models::presence::UserPresence;

const COLUMNS: &str =
    "id, user_id, room_id, is_online, last_active, status, created_at, updated_at";

pub struct UserPresenceRepo;

impl UserPresenceRepo {
    /// Record a user's presence in a room, or site-wide when `room_id` is
    /// `None`. Keeps one row per (user, room) and stamps `last_active`.
    pub async fn set_status(
        pool: &PgPool,
        user_id: DbId,
        room_id: Option<DbId>,
        is_online: bool,
        status: PresenceStatus,
    ) -> Result<UserPresence, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update = format!(
            "UPDATE user_presences
             SET is_online = $3, status = $4, last_active = NOW()
             WHERE user_id = $1 AND room_id IS NOT DISTINCT FROM $2
             RETURNING {COLUMNS}"
        );
        let existing = sqlx::query_as::<_, UserPresence>(&update)
            .bind(user_id)
            .bind(room_id)
            .bind(is_online)
            .bind(status)
            .fetch_optional(&mut *tx)
            .await?;

        let presence = match existing {
            Some(presence) => presence,
            None => {
                let insert = format!(
                    "INSERT INTO user_presences (user_id, room_id, is_online, status)
                     VALUES ($1, $2, $3, $4)
                     RETURNING {COLUMNS}"
                );
                sqlx::query_as::<_, UserPresence>(&insert)
                    .bind(user_id)
                    .bind(room_id)
                    .bind(is_online)
                    .bind(status)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(presence)
    }

    /// Online presences in a room, most recently active first.
    pub async fn list_online(
        pool: &PgPool,
        room_id: DbId,
    ) -> Result<Vec<UserPresence>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_presences
             WHERE room_id = $1 AND is_online = true
             ORDER BY last_active DESC"
        );
        sqlx::query_as::<_, UserPresence>(&query)
            .bind(room_id)
            .fetch_all(pool)
            .await
    }
}
