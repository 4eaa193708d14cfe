//! Repositories for `flashcard_decks` and `flashcards`.

use sqlx::PgPool;
use studyconnect_core::types::DbId;

use crate::models::flashcard::{CreateFlashcard, CreateFlashcardDeck, Flashcard, FlashcardDeck};

const DECK_COLUMNS: &str =
    "id, title, description, is_public, subject_id, owner_id, created_at, updated_at";

const CARD_COLUMNS: &str = "id, deck_id, front, back, position, created_at, updated_at";

pub struct FlashcardDeckRepo;

impl FlashcardDeckRepo {
    /// Insert a new deck, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateFlashcardDeck,
    ) -> Result<FlashcardDeck, sqlx::Error> {
        let query = format!(
            "INSERT INTO flashcard_decks (title, description, is_public, subject_id, owner_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {DECK_COLUMNS}"
        );
        sqlx::query_as::<_, FlashcardDeck>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_public.unwrap_or(false))
            .bind(input.subject_id)
            .bind(input.owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a deck by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FlashcardDeck>, sqlx::Error> {
        let query = format!("SELECT {DECK_COLUMNS} FROM flashcard_decks WHERE id = $1");
        sqlx::query_as::<_, FlashcardDeck>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List decks owned by a user, newest first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<FlashcardDeck>, sqlx::Error> {
        let query = format!(
            "SELECT {DECK_COLUMNS} FROM flashcard_decks WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, FlashcardDeck>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Public decks, optionally restricted to one subject.
    pub async fn list_public(
        pool: &PgPool,
        subject_id: Option<DbId>,
    ) -> Result<Vec<FlashcardDeck>, sqlx::Error> {
        let query = format!(
            "SELECT {DECK_COLUMNS} FROM flashcard_decks
             WHERE is_public = true AND ($1::uuid IS NULL OR subject_id = $1)
             ORDER BY title"
        );
        sqlx::query_as::<_, FlashcardDeck>(&query)
            .bind(subject_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a deck together with its cards.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id::<FlashcardDeck>(pool, id).await
    }
}

pub struct FlashcardRepo;

impl FlashcardRepo {
    /// Append a card at the end of its deck.
    pub async fn add(pool: &PgPool, input: &CreateFlashcard) -> Result<Flashcard, sqlx::Error> {
        let query = format!(
            "INSERT INTO flashcards (deck_id, front, back, position)
             VALUES ($1, $2, $3,
                     (SELECT COALESCE(MAX(position) + 1, 0) FROM flashcards WHERE deck_id = $1))
             RETURNING {CARD_COLUMNS}"
        );
        sqlx::query_as::<_, Flashcard>(&query)
            .bind(input.deck_id)
            .bind(&input.front)
            .bind(&input.back)
            .fetch_one(pool)
            .await
    }

    /// List the cards of a deck in position order.
    pub async fn list_for_deck(pool: &PgPool, deck_id: DbId) -> Result<Vec<Flashcard>, sqlx::Error> {
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM flashcards WHERE deck_id = $1 ORDER BY position, created_at"
        );
        sqlx::query_as::<_, Flashcard>(&query)
            .bind(deck_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a single card.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id::<Flashcard>(pool, id).await
    }
}
