//! Repository for the `resources` table.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::models::resource::{CreateResource, Resource};

const COLUMNS: &str =
    "id, title, description, url, type, room_id, uploaded_by, created_at, updated_at";

pub struct ResourceRepo;

impl ResourceRepo {
    /// Share a resource in a room. See [`CreateResource::resolved_kind`] for
    /// how the type is chosen.
    pub async fn create(pool: &PgPool, input: &CreateResource) -> Result<Resource, sqlx::Error> {
        let query = format!(
            "INSERT INTO resources (title, description, url, type, room_id, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.url)
            .bind(input.resolved_kind())
            .bind(input.room_id)
            .bind(input.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find a resource by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE id = $1");
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List resources shared in a room, newest first.
    pub async fn list_for_room(pool: &PgPool, room_id: DbId) -> Result<Vec<Resource>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM resources WHERE room_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(room_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a resource.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id::<Resource>(pool, id).await
    }
}
