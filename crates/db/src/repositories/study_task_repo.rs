//! Repository for the `study_tasks` table.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::models::enums::TaskPriority;
use crate::models::study_task::{CreateStudyTask, StudyTask, UpdateStudyTask};

const COLUMNS: &str = "id, user_id, title, description, completed, due_date, priority, \
                        estimated_time, actual_time, created_at, updated_at";

pub struct StudyTaskRepo;

impl StudyTaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStudyTask) -> Result<StudyTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO study_tasks (user_id, title, description, due_date, priority, estimated_time)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudyTask>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(input.priority.unwrap_or(TaskPriority::Medium))
            .bind(input.estimated_time)
            .fetch_one(pool)
            .await
    }

    /// Find a task by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StudyTask>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM study_tasks WHERE id = $1");
        sqlx::query_as::<_, StudyTask>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's tasks: open ones first, then by due date (undated last).
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<StudyTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM study_tasks
             WHERE user_id = $1
             ORDER BY completed, due_date NULLS LAST, created_at"
        );
        sqlx::query_as::<_, StudyTask>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStudyTask,
    ) -> Result<Option<StudyTask>, sqlx::Error> {
        let query = format!(
            "UPDATE study_tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                due_date = COALESCE($4, due_date),
                priority = COALESCE($5, priority),
                estimated_time = COALESCE($6, estimated_time),
                actual_time = COALESCE($7, actual_time)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudyTask>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(input.priority)
            .bind(input.estimated_time)
            .bind(input.actual_time)
            .fetch_optional(pool)
            .await
    }

    /// Mark a task done, recording the minutes actually spent when given.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        actual_time: Option<i32>,
    ) -> Result<Option<StudyTask>, sqlx::Error> {
        let query = format!(
            "UPDATE study_tasks SET completed = true, actual_time = COALESCE($2, actual_time)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudyTask>(&query)
            .bind(id)
            .bind(actual_time)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id::<StudyTask>(pool, id).await
    }
}
