//! Repositories for `events` and `user_events`.

use sqlx::PgPool;
use studyconnect_core::error::CoreError;
use studyconnect_core::types::DbId;
use studyconnect_core::validation::validate_input;

use crate::error::DbError;
use crate::models::enums::AttendanceStatus;
use crate::models::event::{CreateEvent, Event, UserEvent, DEFAULT_EVENT_DURATION};

const COLUMNS: &str =
    "id, title, description, date, duration, room_id, created_by, created_at, updated_at";

const RESPONSE_COLUMNS: &str = "id, user_id, event_id, status, created_at, updated_at";

pub struct EventRepo;

impl EventRepo {
    /// Validate and insert an event.
    ///
    /// Fails with [`CoreError::Validation`] before touching the database when
    /// the title is empty or the date is missing.
    pub async fn create(pool: &PgPool, input: &CreateEvent) -> Result<Event, DbError> {
        validate_input(input)?;
        let Some(date) = input.date else {
            return Err(CoreError::Validation("Event date is required".into()).into());
        };

        let query = format!(
            "INSERT INTO events (title, description, date, duration, room_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(date)
            .bind(input.duration.unwrap_or(DEFAULT_EVENT_DURATION))
            .bind(input.room_id)
            .bind(input.created_by)
            .fetch_one(pool)
            .await?;
        Ok(event)
    }

    /// Find an event by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Events in a room that have not started yet, soonest first.
    pub async fn list_upcoming_for_room(
        pool: &PgPool,
        room_id: DbId,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE room_id = $1 AND date >= NOW()
             ORDER BY date"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(room_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an event and its attendance rows. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id::<Event>(pool, id).await
    }
}

/// Attendance responses to events.
pub struct UserEventRepo;

impl UserEventRepo {
    /// Record or change a user's response to an event.
    pub async fn respond(
        pool: &PgPool,
        user_id: DbId,
        event_id: DbId,
        status: AttendanceStatus,
    ) -> Result<UserEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_events (user_id, event_id, status)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_user_events_user_id_event_id
             DO UPDATE SET status = EXCLUDED.status
             RETURNING {RESPONSE_COLUMNS}"
        );
        sqlx::query_as::<_, UserEvent>(&query)
            .bind(user_id)
            .bind(event_id)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// List attendance responses for an event.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<UserEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM user_events WHERE event_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, UserEvent>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Remove a user's response to an event.
    pub async fn withdraw(pool: &PgPool, user_id: DbId, event_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_events WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
