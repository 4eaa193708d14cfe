//! Study room and membership models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};

use crate::models::enums::RoomRole;
use crate::schema::{entities, Entity, EntityDef};

/// A row from the `study_rooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudyRoom {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub subject_id: Option<DbId>,
    pub created_by: DbId,
    pub is_private: bool,
    pub max_members: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for StudyRoom {
    fn definition() -> &'static EntityDef {
        &entities::STUDY_ROOMS
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateStudyRoom {
    pub name: String,
    pub description: Option<String>,
    pub subject_id: Option<DbId>,
    pub created_by: DbId,
    pub is_private: Option<bool>,
    pub max_members: Option<i32>,
}

/// A row from the `user_study_rooms` join table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserStudyRoom {
    pub id: DbId,
    pub user_id: DbId,
    pub room_id: DbId,
    pub role: RoomRole,
    pub joined_at: Timestamp,
    pub last_active: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for UserStudyRoom {
    fn definition() -> &'static EntityDef {
        &entities::USER_STUDY_ROOMS
    }
}

/// A room member with their display name, as listed for a room.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoomMember {
    pub user_id: DbId,
    pub name: String,
    pub role: RoomRole,
    pub joined_at: Timestamp,
}
