//! Delete behaviour along the association graph.

mod common;

use sqlx::PgPool;
use studyconnect_db::models::direct_message::CreateDirectMessage;
use studyconnect_db::models::enums::{AttendanceStatus, RoomRole};
use studyconnect_db::models::event::CreateEvent;
use studyconnect_db::models::flashcard::{CreateFlashcard, CreateFlashcardDeck};
use studyconnect_db::models::message::CreateMessage;
use studyconnect_db::models::notification::CreateNotification;
use studyconnect_db::models::subject::CreateUserSubject;
use studyconnect_db::repositories::{
    DirectMessageRepo, EventRepo, FlashcardDeckRepo, FlashcardRepo, FriendshipRepo, MessageRepo,
    NotificationRepo, SubjectRepo, UserEventRepo, UserPreferenceRepo, UserRepo,
    UserStudyRoomRepo, UserSubjectRepo,
};
use studyconnect_db::schema::registry;

async fn count_for_user(pool: &PgPool, table: &str, column: &str, user_id: uuid::Uuid) -> i64 {
    let (count,): (i64,) =
        sqlx::query_as(&format!("SELECT COUNT(*) FROM {table} WHERE {column} = $1"))
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap();
    count
}

#[sqlx::test(migrations = false)]
async fn test_deleting_user_cascades_to_owned_rows(pool: PgPool) {
    common::migrate(&pool).await;

    let alice = common::create_user(&pool, "Alice").await;
    let bob = common::create_user(&pool, "Bob").await;
    let subject = common::create_subject(&pool, "Chemistry").await;

    // Bob owns the room so it survives Alice's deletion.
    let room = common::create_room(&pool, bob.id, Some(subject.id)).await;
    UserStudyRoomRepo::join(&pool, alice.id, room.id, RoomRole::Member)
        .await
        .unwrap();
    UserSubjectRepo::add(
        &pool,
        &CreateUserSubject {
            user_id: alice.id,
            subject_id: subject.id,
            proficiency_level: None,
            is_teaching: Some(true),
        },
    )
    .await
    .unwrap();
    MessageRepo::create(
        &pool,
        &CreateMessage {
            content: "hello room".into(),
            room_id: room.id,
            sender_id: alice.id,
            is_system: None,
        },
    )
    .await
    .unwrap();
    NotificationRepo::create(
        &pool,
        &CreateNotification {
            user_id: alice.id,
            message: "Welcome".into(),
            kind: None,
            related_id: None,
            related_type: None,
        },
    )
    .await
    .unwrap();
    UserPreferenceRepo::ensure_defaults(&pool, alice.id)
        .await
        .unwrap();
    let event = EventRepo::create(
        &pool,
        &CreateEvent {
            title: "Mock exam".into(),
            description: None,
            date: Some(chrono::Utc::now()),
            duration: None,
            room_id: room.id,
            created_by: bob.id,
        },
    )
    .await
    .unwrap();
    UserEventRepo::respond(&pool, alice.id, event.id, AttendanceStatus::Attending)
        .await
        .unwrap();
    for (sender, receiver) in [(alice.id, bob.id), (bob.id, alice.id)] {
        DirectMessageRepo::create(
            &pool,
            &CreateDirectMessage {
                content: "hi".into(),
                sender_id: sender,
                receiver_id: receiver,
            },
        )
        .await
        .unwrap();
    }
    FriendshipRepo::request(&pool, alice.id, bob.id).await.unwrap();

    assert!(UserRepo::delete(&pool, alice.id).await.unwrap());

    for (table, column) in [
        ("messages", "sender_id"),
        ("notifications", "user_id"),
        ("user_preferences", "user_id"),
        ("user_study_rooms", "user_id"),
        ("user_subjects", "user_id"),
        ("user_events", "user_id"),
        ("direct_messages", "sender_id"),
        ("direct_messages", "receiver_id"),
        ("friendships", "sender_id"),
        ("friendships", "receiver_id"),
    ] {
        assert_eq!(
            count_for_user(&pool, table, column, alice.id).await,
            0,
            "{table}.{column} rows should be gone"
        );
    }

    // Bob's side is untouched.
    assert_eq!(common::count_rows(&pool, "study_rooms").await, 1);
    assert_eq!(common::count_rows(&pool, "events").await, 1);
    assert_eq!(count_for_user(&pool, "user_study_rooms", "user_id", bob.id).await, 1);
}

#[sqlx::test(migrations = false)]
async fn test_deleting_subject_unlinks_decks_and_rooms(pool: PgPool) {
    common::migrate(&pool).await;

    let owner = common::create_user(&pool, "Deck Owner").await;
    let subject = common::create_subject(&pool, "Biology").await;
    let room = common::create_room(&pool, owner.id, Some(subject.id)).await;
    let deck = FlashcardDeckRepo::create(
        &pool,
        &CreateFlashcardDeck {
            title: "Cell parts".into(),
            description: None,
            is_public: Some(true),
            subject_id: Some(subject.id),
            owner_id: owner.id,
        },
    )
    .await
    .unwrap();
    FlashcardRepo::add(
        &pool,
        &CreateFlashcard {
            deck_id: deck.id,
            front: "Powerhouse of the cell".into(),
            back: "Mitochondria".into(),
        },
    )
    .await
    .unwrap();

    assert!(SubjectRepo::delete(&pool, subject.id).await.unwrap());

    let deck = FlashcardDeckRepo::find_by_id(&pool, deck.id)
        .await
        .unwrap()
        .expect("deck should survive subject deletion");
    assert_eq!(deck.subject_id, None);
    assert_eq!(FlashcardRepo::list_for_deck(&pool, deck.id).await.unwrap().len(), 1);

    let (room_subject,): (Option<uuid::Uuid>,) =
        sqlx::query_as("SELECT subject_id FROM study_rooms WHERE id = $1")
            .bind(room.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(room_subject, None);
}

#[sqlx::test(migrations = false)]
async fn test_deleting_deck_removes_cards(pool: PgPool) {
    common::migrate(&pool).await;

    let owner = common::create_user(&pool, "Card Owner").await;
    let deck = FlashcardDeckRepo::create(
        &pool,
        &CreateFlashcardDeck {
            title: "Verbs".into(),
            description: None,
            is_public: None,
            subject_id: None,
            owner_id: owner.id,
        },
    )
    .await
    .unwrap();
    for front in ["ser", "estar"] {
        FlashcardRepo::add(
            &pool,
            &CreateFlashcard {
                deck_id: deck.id,
                front: front.into(),
                back: "to be".into(),
            },
        )
        .await
        .unwrap();
    }

    assert!(FlashcardDeckRepo::delete(&pool, deck.id).await.unwrap());
    assert_eq!(common::count_rows(&pool, "flashcards").await, 0);
}

/// Every table the registry says a user delete reaches is actually emptied.
#[sqlx::test(migrations = false)]
async fn test_cascade_closure_matches_storage(pool: PgPool) {
    common::migrate(&pool).await;

    let owner = common::create_user(&pool, "Closure Owner").await;
    let room = common::create_room(&pool, owner.id, None).await;
    MessageRepo::create(
        &pool,
        &CreateMessage {
            content: "only message".into(),
            room_id: room.id,
            sender_id: owner.id,
            is_system: Some(true),
        },
    )
    .await
    .unwrap();

    let closure = registry().cascade_closure("users");
    assert!(closure.contains(&"study_rooms"));
    assert!(closure.contains(&"messages"));

    UserRepo::delete(&pool, owner.id).await.unwrap();
    for table in closure {
        assert_eq!(common::count_rows(&pool, table).await, 0, "{table} should be empty");
    }
}
