//! Notification model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};

use crate::models::enums::NotificationType;
use crate::schema::{entities, Entity, EntityDef};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub message: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub is_read: bool,
    pub related_id: Option<DbId>,
    pub related_type: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for Notification {
    fn definition() -> &'static EntityDef {
        &entities::NOTIFICATIONS
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<NotificationType>,
    pub related_id: Option<DbId>,
    pub related_type: Option<String>,
}
