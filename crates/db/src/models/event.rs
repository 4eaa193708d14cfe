//! Event and attendance models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::enums::AttendanceStatus;
use crate::schema::{entities, Entity, EntityDef};

/// Default event length in minutes.
pub const DEFAULT_EVENT_DURATION: i32 = 60;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub date: Timestamp,
    /// Length in minutes.
    pub duration: i32,
    pub room_id: DbId,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for Event {
    fn definition() -> &'static EntityDef {
        &entities::EVENTS
    }
}

/// DTO for scheduling an event.
///
/// Validated before any write; the messages are surfaced to callers as-is.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(custom(
        function = "studyconnect_core::validation::not_blank",
        message = "Event title is required"
    ))]
    pub title: String,
    pub description: Option<String>,
    #[validate(required(message = "Event date is required"))]
    pub date: Option<Timestamp>,
    #[validate(range(min = 1, message = "Event duration must be positive"))]
    pub duration: Option<i32>,
    pub room_id: DbId,
    pub created_by: DbId,
}

/// A row from the `user_events` join table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserEvent {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: DbId,
    pub status: AttendanceStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for UserEvent {
    fn definition() -> &'static EntityDef {
        &entities::USER_EVENTS
    }
}
