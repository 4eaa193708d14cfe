//! Direct (user-to-user) message models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};

use crate::schema::{entities, Entity, EntityDef};

/// A row from the `direct_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DirectMessage {
    pub id: DbId,
    pub content: String,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for DirectMessage {
    fn definition() -> &'static EntityDef {
        &entities::DIRECT_MESSAGES
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDirectMessage {
    pub content: String,
    pub sender_id: DbId,
    pub receiver_id: DbId,
}
