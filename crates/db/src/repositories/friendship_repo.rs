//! Repository for the `friendships` table.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::models::enums::FriendshipStatus;
use crate::models::friendship::Friendship;

const COLUMNS: &str = "id, sender_id, receiver_id, status, created_at, updated_at";

pub struct FriendshipRepo;

impl FriendshipRepo {
    /// Send a friend request. A second request for the same
    /// (sender, receiver) pair violates `uq_friendships_sender_id_receiver_id`;
    /// a request to oneself violates `ck_friendships_not_self`.
    pub async fn request(
        pool: &PgPool,
        sender_id: DbId,
        receiver_id: DbId,
    ) -> Result<Friendship, sqlx::Error> {
        let query = format!(
            "INSERT INTO friendships (sender_id, receiver_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(sender_id)
            .bind(receiver_id)
            .fetch_one(pool)
            .await
    }

    /// Accept or reject a pending request. Only the receiver may respond.
    ///
    /// Returns `None` if there is no pending request with this id addressed
    /// to `receiver_id`.
    pub async fn respond(
        pool: &PgPool,
        id: DbId,
        receiver_id: DbId,
        status: FriendshipStatus,
    ) -> Result<Option<Friendship>, sqlx::Error> {
        let query = format!(
            "UPDATE friendships SET status = $3
             WHERE id = $1 AND receiver_id = $2 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(id)
            .bind(receiver_id)
            .bind(status)
            .bind(FriendshipStatus::Pending)
            .fetch_optional(pool)
            .await
    }

    /// Friendships the user is part of on either side, optionally filtered
    /// by status. Newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<FriendshipStatus>,
    ) -> Result<Vec<Friendship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM friendships
             WHERE (sender_id = $1 OR receiver_id = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(user_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Delete a friendship or pending request.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id::<Friendship>(pool, id).await
    }
}
