//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where the
//!   entity is edited in place

pub mod direct_message;
pub mod enums;
pub mod event;
pub mod flashcard;
pub mod friendship;
pub mod message;
pub mod notification;
pub mod preference;
pub mod presence;
pub mod resource;
pub mod study_room;
pub mod study_task;
pub mod subject;
pub mod user;
