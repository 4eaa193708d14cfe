//! Flashcard deck and card models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studyconnect_core::types::{DbId, Timestamp};

use crate::schema::{entities, Entity, EntityDef};

/// A row from the `flashcard_decks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FlashcardDeck {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub subject_id: Option<DbId>,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for FlashcardDeck {
    fn definition() -> &'static EntityDef {
        &entities::FLASHCARD_DECKS
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateFlashcardDeck {
    pub title: String,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub subject_id: Option<DbId>,
    pub owner_id: DbId,
}

/// A row from the `flashcards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Flashcard {
    pub id: DbId,
    pub deck_id: DbId,
    pub front: String,
    pub back: String,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for Flashcard {
    fn definition() -> &'static EntityDef {
        &entities::FLASHCARDS
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateFlashcard {
    pub deck_id: DbId,
    pub front: String,
    pub back: String,
}
