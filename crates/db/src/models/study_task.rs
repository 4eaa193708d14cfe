//! Personal study task model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};

use crate::models::enums::TaskPriority;
use crate::schema::{entities, Entity, EntityDef};

/// A row from the `study_tasks` table. Times are whole minutes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudyTask {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub due_date: Option<Timestamp>,
    pub priority: TaskPriority,
    pub estimated_time: Option<i32>,
    pub actual_time: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for StudyTask {
    fn definition() -> &'static EntityDef {
        &entities::STUDY_TASKS
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateStudyTask {
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<Timestamp>,
    pub priority: Option<TaskPriority>,
    pub estimated_time: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStudyTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Timestamp>,
    pub priority: Option<TaskPriority>,
    pub estimated_time: Option<i32>,
    pub actual_time: Option<i32>,
}
