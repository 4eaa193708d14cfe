//! Repositories for `study_rooms` and room membership.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::models::enums::RoomRole;
use crate::models::study_room::{CreateStudyRoom, RoomMember, StudyRoom, UserStudyRoom};

const COLUMNS: &str = "id, name, description, subject_id, created_by, is_private, max_members, \
                        created_at, updated_at";

const MEMBER_COLUMNS: &str =
    "id, user_id, room_id, role, joined_at, last_active, created_at, updated_at";

/// Default member cap for a new room.
const DEFAULT_MAX_MEMBERS: i32 = 10;

pub struct StudyRoomRepo;

impl StudyRoomRepo {
    /// Create a room and make its creator the owner, in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateStudyRoom) -> Result<StudyRoom, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO study_rooms (name, description, subject_id, created_by, is_private, max_members)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let room = sqlx::query_as::<_, StudyRoom>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.subject_id)
            .bind(input.created_by)
            .bind(input.is_private.unwrap_or(false))
            .bind(input.max_members.unwrap_or(DEFAULT_MAX_MEMBERS))
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO user_study_rooms (user_id, room_id, role) VALUES ($1, $2, $3)")
            .bind(room.created_by)
            .bind(room.id)
            .bind(RoomRole::Owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(room)
    }

    /// Find a room by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StudyRoom>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM study_rooms WHERE id = $1");
        sqlx::query_as::<_, StudyRoom>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Public rooms, newest first.
    pub async fn list_public(pool: &PgPool) -> Result<Vec<StudyRoom>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM study_rooms WHERE is_private = false ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, StudyRoom>(&query).fetch_all(pool).await
    }

    /// Rooms the user belongs to, most recently joined first.
    pub async fn list_for_member(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<StudyRoom>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM study_rooms r
             JOIN user_study_rooms m ON m.room_id = r.id
             WHERE m.user_id = $1
             ORDER BY m.joined_at DESC",
            prefixed("r")
        );
        sqlx::query_as::<_, StudyRoom>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a room along with its messages, events, memberships and resources.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id::<StudyRoom>(pool, id).await
    }
}

fn prefixed(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Room membership.
pub struct UserStudyRoomRepo;

impl UserStudyRoomRepo {
    /// Add a user to a room. Joining twice violates
    /// `uq_user_study_rooms_user_id_room_id`.
    pub async fn join(
        pool: &PgPool,
        user_id: DbId,
        room_id: DbId,
        role: RoomRole,
    ) -> Result<UserStudyRoom, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_study_rooms (user_id, room_id, role)
             VALUES ($1, $2, $3)
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, UserStudyRoom>(&query)
            .bind(user_id)
            .bind(room_id)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Remove a user's membership of a room.
    pub async fn leave(pool: &PgPool, user_id: DbId, room_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_study_rooms WHERE user_id = $1 AND room_id = $2")
            .bind(user_id)
            .bind(room_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp `last_active` for a member.
    pub async fn touch(pool: &PgPool, user_id: DbId, room_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_study_rooms SET last_active = NOW() WHERE user_id = $1 AND room_id = $2",
        )
        .bind(user_id)
        .bind(room_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Members of a room with their names, in join order.
    pub async fn list_members(pool: &PgPool, room_id: DbId) -> Result<Vec<RoomMember>, sqlx::Error> {
        sqlx::query_as::<_, RoomMember>(
            "SELECT m.user_id, u.name, m.role, m.joined_at
             FROM user_study_rooms m
             JOIN users u ON u.id = m.user_id
             WHERE m.room_id = $1
             ORDER BY m.joined_at, u.name",
        )
        .bind(room_id)
        .fetch_all(pool)
        .await
    }
}
