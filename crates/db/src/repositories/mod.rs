//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Constraint violations are
//! returned unchanged; see [`crate::error::constraint_violation`].

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::schema::Entity;

pub mod direct_message_repo;
pub mod event_repo;
pub mod flashcard_repo;
pub mod friendship_repo;
pub mod message_repo;
pub mod notification_repo;
pub mod preference_repo;
pub mod presence_repo;
pub mod resource_repo;
pub mod study_room_repo;
pub mod study_task_repo;
pub mod subject_repo;
pub mod user_repo;

pub use direct_message_repo::DirectMessageRepo;
pub use event_repo::{EventRepo, UserEventRepo};
pub use flashcard_repo::{FlashcardDeckRepo, FlashcardRepo};
pub use friendship_repo::FriendshipRepo;
pub use message_repo::MessageRepo;
pub use notification_repo::NotificationRepo;
pub use preference_repo::UserPreferenceRepo;
pub use presence_repo::UserPresenceRepo;
pub use resource_repo::ResourceRepo;
pub use study_room_repo::{StudyRoomRepo, UserStudyRoomRepo};
pub use study_task_repo::StudyTaskRepo;
pub use subject_repo::{SubjectRepo, UserSubjectRepo};
pub use user_repo::UserRepo;

/// Hard-delete the row of `E` with the given id. Dependent rows follow the
/// foreign keys' delete rules.
///
/// Returns `true` if a row was removed.
pub async fn delete_by_id<E: Entity>(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
    let query = format!("DELETE FROM {} WHERE id = $1", E::table());
    let result = sqlx::query(&query).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
