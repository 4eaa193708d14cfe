//! Per-user preference model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};

use crate::models::enums::Theme;
use crate::schema::{entities, Entity, EntityDef};

/// A row from the `user_preferences` table. At most one per user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserPreference {
    pub id: DbId,
    pub user_id: DbId,
    pub notification_email: bool,
    pub notification_push: bool,
    pub theme: Theme,
    pub language: String,
    pub timezone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for UserPreference {
    fn definition() -> &'static EntityDef {
        &entities::USER_PREFERENCES
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserPreference {
    pub notification_email: Option<bool>,
    pub notification_push: Option<bool>,
    pub theme: Option<Theme>,
    pub language: Option<String>,
    pub timezone: Option<String>,
}
