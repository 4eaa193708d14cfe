//! Presence model.

use serde::Serialize;
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};

use crate::models::enums::PresenceStatus;
use crate::schema::{entities, Entity, EntityDef};

/// A row from the `user_presences` table. `room_id` is `None` for
/// site-wide presence.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserPresence {
    pub id: DbId,
    pub user_id: DbId,
    pub room_id: Option<DbId>,
    pub is_online: bool,
    pub last_active: Timestamp,
    pub status: PresenceStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for UserPresence {
    fn definition() -> &'static EntityDef {
        &entities::USER_PRESENCES
    }
}
