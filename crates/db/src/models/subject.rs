//! Subject entity model and the user/subject link.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};

use crate::models::enums::ProficiencyLevel;
use crate::schema::{entities, Entity, EntityDef};

/// A row from the `subjects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subject {
    pub id: DbId,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for Subject {
    fn definition() -> &'static EntityDef {
        &entities::SUBJECTS
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSubject {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubject {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// A row from the `user_subjects` join table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSubject {
    pub id: DbId,
    pub user_id: DbId,
    pub subject_id: DbId,
    pub proficiency_level: ProficiencyLevel,
    pub is_teaching: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for UserSubject {
    fn definition() -> &'static EntityDef {
        &entities::USER_SUBJECTS
    }
}

/// DTO linking a user to a subject. Defaults: `beginner`, not teaching.
#[derive(Debug, Deserialize)]
pub struct CreateUserSubject {
    pub user_id: DbId,
    pub subject_id: DbId,
    pub proficiency_level: Option<ProficiencyLevel>,
    pub is_teaching: Option<bool>,
}
