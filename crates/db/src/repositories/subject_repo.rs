//! Repositories for the `subjects` and `user_subjects` tables.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::models::enums::ProficiencyLevel;
use crate::models::subject::{
    CreateSubject, CreateUserSubject, Subject, UpdateSubject, UserSubject,
};

const COLUMNS: &str = "id, name, category, description, icon, created_at, updated_at";

const LINK_COLUMNS: &str =
    "id, user_id, subject_id, proficiency_level, is_teaching, created_at, updated_at";

/// Provides CRUD operations for subjects.
pub struct SubjectRepo;

impl SubjectRepo {
    /// Insert a new subject, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSubject) -> Result<Subject, sqlx::Error> {
        let query = format!(
            "INSERT INTO subjects (name, category, description, icon)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.icon)
            .fetch_one(pool)
            .await
    }

    /// Find a subject by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE id = $1");
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all subjects alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Subject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subjects ORDER BY name");
        sqlx::query_as::<_, Subject>(&query).fetch_all(pool).await
    }

    /// Update a subject. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubject,
    ) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!(
            "UPDATE subjects SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                icon = COALESCE($5, icon)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.icon)
            .fetch_optional(pool)
            .await
    }

    /// Delete a subject. Rooms and decks that referenced it keep existing
    /// with `subject_id` cleared.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id::<Subject>(pool, id).await
    }
}

/// Links users to the subjects they study or teach.
pub struct UserSubjectRepo;

impl UserSubjectRepo {
    /// Link a user to a subject. A second link for the same pair violates
    /// `uq_user_subjects_user_id_subject_id`.
    pub async fn add(pool: &PgPool, input: &CreateUserSubject) -> Result<UserSubject, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_subjects (user_id, subject_id, proficiency_level, is_teaching)
             VALUES ($1, $2, $3, $4)
             RETURNING {LINK_COLUMNS}"
        );
        sqlx::query_as::<_, UserSubject>(&query)
            .bind(input.user_id)
            .bind(input.subject_id)
            .bind(input.proficiency_level.unwrap_or(ProficiencyLevel::Beginner))
            .bind(input.is_teaching.unwrap_or(false))
            .fetch_one(pool)
            .await
    }

    /// List the subjects a user is linked to.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserSubject>, sqlx::Error> {
        let query = format!(
            "SELECT {LINK_COLUMNS} FROM user_subjects WHERE user_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, UserSubject>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Users teaching the given subject.
    pub async fn list_tutors(
        pool: &PgPool,
        subject_id: DbId,
    ) -> Result<Vec<UserSubject>, sqlx::Error> {
        let query = format!(
            "SELECT {LINK_COLUMNS} FROM user_subjects
             WHERE subject_id = $1 AND is_teaching = true
             ORDER BY created_at"
        );
        sqlx::query_as::<_, UserSubject>(&query)
            .bind(subject_id)
            .fetch_all(pool)
            .await
    }

    /// Unlink a user from a subject.
    pub async fn remove(pool: &PgPool, user_id: DbId, subject_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_subjects WHERE user_id = $1 AND subject_id = $2")
            .bind(user_id)
            .bind(subject_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
