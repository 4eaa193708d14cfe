//! Friendship model.

use serde::Serialize;
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};

use crate::models::enums::FriendshipStatus;
use crate::schema::{entities, Entity, EntityDef};

/// A row from the `friendships` table. Direction matters: `sender_id`
/// requested, `receiver_id` responds.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Friendship {
    pub id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub status: FriendshipStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for Friendship {
    fn definition() -> &'static EntityDef {
        &entities::FRIENDSHIPS
    }
}
