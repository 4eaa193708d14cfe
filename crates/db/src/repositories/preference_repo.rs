//! Repository for the `user_preferences` table.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::models::preference::{UpdateUserPreference, UserPreference};

const COLUMNS: &str = "id, user_id, notification_email, notification_push, theme, language, \
                        timezone, created_at, updated_at";

pub struct UserPreferenceRepo;

impl UserPreferenceRepo {
    /// Get a user's preferences, if a row exists.
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<Option<UserPreference>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1");
        sqlx::query_as::<_, UserPreference>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the user's preferences, creating the default row first if the
    /// user has none.
    pub async fn ensure_defaults(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<UserPreference, sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_preferences (user_id) VALUES ($1)
             ON CONFLICT ON CONSTRAINT uq_user_preferences_user_id DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1");
        sqlx::query_as::<_, UserPreference>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Apply the non-`None` fields of `input`. Returns `None` if the user has
    /// no preference row.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateUserPreference,
    ) -> Result<Option<UserPreference>, sqlx::Error> {
        let query = format!(
            "UPDATE user_preferences SET
                notification_email = COALESCE($2, notification_email),
                notification_push = COALESCE($3, notification_push),
                theme = COALESCE($4, theme),
                language = COALESCE($5, language),
                timezone = COALESCE($6, timezone)
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPreference>(&query)
            .bind(user_id)
            .bind(input.notification_email)
            .bind(input.notification_push)
            .bind(input.theme)
            .bind(&input.language)
            .bind(&input.timezone)
            .fetch_optional(pool)
            .await
    }
}
