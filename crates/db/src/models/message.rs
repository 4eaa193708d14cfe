//! Room message models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};

use crate::schema::{entities, Entity, EntityDef};

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub content: String,
    pub room_id: DbId,
    pub sender_id: DbId,
    pub is_system: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for Message {
    fn definition() -> &'static EntityDef {
        &entities::MESSAGES
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMessage {
    pub content: String,
    pub room_id: DbId,
    pub sender_id: DbId,
    pub is_system: Option<bool>,
}

/// A message joined with its sender's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageWithSender {
    pub id: DbId,
    pub content: String,
    pub sender_id: DbId,
    pub sender_name: String,
    pub is_system: bool,
    pub created_at: Timestamp,
}
