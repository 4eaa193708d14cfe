//! Shared helpers for database integration tests.
//!
//! Tests run with `#[sqlx::test(migrations = false)]` and bring the schema up
//! through the crate's own migrator.

#![allow(dead_code)]

use sqlx::PgPool;
use studyconnect_db::models::enums::{ResourceType, UserRole};
use studyconnect_db::models::study_room::{CreateStudyRoom, StudyRoom};
use studyconnect_db::models::subject::{CreateSubject, Subject};
use studyconnect_db::models::user::{CreateUser, User};
use studyconnect_db::repositories::{StudyRoomRepo, SubjectRepo, UserRepo};
use studyconnect_db::Migrator;
use uuid::Uuid;

/// Apply the full migration log.
pub async fn migrate(pool: &PgPool) {
    Migrator::default()
        .up(pool)
        .await
        .expect("full migration log should apply");
}

pub async fn create_user(pool: &PgPool, name: &str) -> User {
    let email = format!("{}@example.test", name.to_lowercase().replace(' ', "."));
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email,
            password_hash: "$argon2id$not-a-real-hash".to_string(),
            role: Some(UserRole::Student),
        },
    )
    .await
    .expect("user insert should succeed")
}

pub async fn create_subject(pool: &PgPool, name: &str) -> Subject {
    SubjectRepo::create(
        pool,
        &CreateSubject {
            name: name.to_string(),
            category: Some("Science".to_string()),
            description: None,
            icon: None,
        },
    )
    .await
    .expect("subject insert should succeed")
}

pub async fn create_room(pool: &PgPool, owner: Uuid, subject: Option<Uuid>) -> StudyRoom {
    StudyRoomRepo::create(
        pool,
        &CreateStudyRoom {
            name: "Evening revision".to_string(),
            description: None,
            subject_id: subject,
            created_by: owner,
            is_private: None,
            max_members: None,
        },
    )
    .await
    .expect("room insert should succeed")
}

/// Insert a resource directly, bypassing type resolution.
pub async fn insert_resource(
    pool: &PgPool,
    room_id: Uuid,
    uploaded_by: Uuid,
    url: Option<&str>,
    kind: ResourceType,
) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO resources (title, url, type, room_id, uploaded_by)
         VALUES ('Shared file', $1, $2, $3, $4)
         RETURNING id",
    )
    .bind(url)
    .bind(kind)
    .bind(room_id)
    .bind(uploaded_by)
    .fetch_one(pool)
    .await
    .expect("resource insert should succeed");
    id
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("count on {table} failed: {e}"));
    count
}
