//! Integration tests for the repository layer.

mod common;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use studyconnect_core::error::CoreError;
use studyconnect_db::error::DbError;
use studyconnect_db::models::direct_message::CreateDirectMessage;
use studyconnect_db::models::enums::{
    FriendshipStatus, PresenceStatus, ResourceType, RoomRole, TaskPriority, Theme, UserRole,
};
use studyconnect_db::models::event::CreateEvent;
use studyconnect_db::models::message::CreateMessage;
use studyconnect_db::models::notification::CreateNotification;
use studyconnect_db::models::preference::UpdateUserPreference;
use studyconnect_db::models::resource::CreateResource;
use studyconnect_db::models::study_task::{CreateStudyTask, UpdateStudyTask};
use studyconnect_db::models::user::{UpdateUser, UserResponse};
use studyconnect_db::repositories::{
    DirectMessageRepo, EventRepo, FriendshipRepo, MessageRepo, NotificationRepo, ResourceRepo,
    StudyRoomRepo, StudyTaskRepo, UserPreferenceRepo, UserPresenceRepo, UserRepo,
    UserStudyRoomRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_event(room_id: uuid::Uuid, created_by: uuid::Uuid) -> CreateEvent {
    CreateEvent {
        title: "Group review".to_string(),
        description: None,
        date: Some(Utc::now() + Duration::days(1)),
        duration: None,
        room_id,
        created_by,
    }
}

fn new_task(user_id: uuid::Uuid, title: &str) -> CreateStudyTask {
    CreateStudyTask {
        user_id,
        title: title.to_string(),
        description: None,
        due_date: None,
        priority: None,
        estimated_time: Some(45),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_user_defaults_and_update(pool: PgPool) {
    common::migrate(&pool).await;

    let user = common::create_user(&pool, "Dana").await;
    assert_eq!(user.role, UserRole::Student);
    assert!(user.is_active);
    assert!(user.avatar_url.is_none());

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            bio: Some("Maths tutor".into()),
            role: Some(UserRole::Tutor),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.role, UserRole::Tutor);
    assert_eq!(updated.bio.as_deref(), Some("Maths tutor"));
    assert_eq!(updated.name, "Dana");

    let response = serde_json::to_value(UserResponse::from(updated)).unwrap();
    assert!(response.get("password_hash").is_none());
    assert_eq!(response["role"], "tutor");
}

#[sqlx::test(migrations = false)]
async fn test_user_deactivate_is_one_shot(pool: PgPool) {
    common::migrate(&pool).await;

    let user = common::create_user(&pool, "Eli").await;
    assert!(UserRepo::deactivate(&pool, user.id).await.unwrap());
    assert!(!UserRepo::deactivate(&pool, user.id).await.unwrap());
    assert!(UserRepo::update(&pool, uuid::Uuid::new_v4(), &UpdateUser::default())
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Rooms and messages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_room_creator_becomes_owner(pool: PgPool) {
    common::migrate(&pool).await;

    let owner = common::create_user(&pool, "Owner").await;
    let guest = common::create_user(&pool, "Guest").await;
    let room = common::create_room(&pool, owner.id, None).await;
    assert_eq!(room.max_members, 10);
    assert!(!room.is_private);

    UserStudyRoomRepo::join(&pool, guest.id, room.id, RoomRole::Member)
        .await
        .unwrap();

    let members = UserStudyRoomRepo::list_members(&pool, room.id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].user_id, owner.id);
    assert_eq!(members[0].role, RoomRole::Owner);

    assert_eq!(
        StudyRoomRepo::list_for_member(&pool, guest.id).await.unwrap().len(),
        1
    );
    assert!(UserStudyRoomRepo::leave(&pool, guest.id, room.id).await.unwrap());
    assert!(StudyRoomRepo::list_for_member(&pool, guest.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = false)]
async fn test_room_messages_carry_sender_names(pool: PgPool) {
    common::migrate(&pool).await;

    let owner = common::create_user(&pool, "Fatima").await;
    let room = common::create_room(&pool, owner.id, None).await;
    for content in ["first", "second", "third"] {
        MessageRepo::create(
            &pool,
            &CreateMessage {
                content: content.into(),
                room_id: room.id,
                sender_id: owner.id,
                is_system: None,
            },
        )
        .await
        .unwrap();
    }

    let latest = MessageRepo::list_for_room(&pool, room.id, 2).await.unwrap();
    let contents: Vec<&str> = latest.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["second", "third"]);
    assert!(latest.iter().all(|m| m.sender_name == "Fatima"));
}

#[sqlx::test(migrations = false)]
async fn test_direct_message_conversation_and_read(pool: PgPool) {
    common::migrate(&pool).await;

    let a = common::create_user(&pool, "Gus").await;
    let b = common::create_user(&pool, "Hana").await;
    let c = common::create_user(&pool, "Ivo").await;
    for (sender, receiver) in [(a.id, b.id), (b.id, a.id), (c.id, b.id)] {
        DirectMessageRepo::create(
            &pool,
            &CreateDirectMessage {
                content: "ping".into(),
                sender_id: sender,
                receiver_id: receiver,
            },
        )
        .await
        .unwrap();
    }

    let convo = DirectMessageRepo::conversation(&pool, a.id, b.id).await.unwrap();
    assert_eq!(convo.len(), 2);
    assert_eq!(DirectMessageRepo::count_unread(&pool, b.id).await.unwrap(), 2);

    assert_eq!(DirectMessageRepo::mark_read(&pool, b.id, a.id).await.unwrap(), 1);
    assert_eq!(DirectMessageRepo::count_unread(&pool, b.id).await.unwrap(), 1);

    let convo = DirectMessageRepo::conversation(&pool, b.id, a.id).await.unwrap();
    let read = convo.iter().find(|m| m.receiver_id == b.id).unwrap();
    assert!(read.is_read);
    assert!(read.read_at.is_some());
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_event_requires_title_and_date(pool: PgPool) {
    common::migrate(&pool).await;

    let owner = common::create_user(&pool, "Jon").await;
    let room = common::create_room(&pool, owner.id, None).await;

    let mut untitled = new_event(room.id, owner.id);
    untitled.title = String::new();
    let err = EventRepo::create(&pool, &untitled).await.unwrap_err();
    assert_matches!(
        err,
        DbError::Core(CoreError::Validation(ref msg)) if msg == "Event title is required"
    );

    let mut blank_title = new_event(room.id, owner.id);
    blank_title.title = "   ".into();
    let err = EventRepo::create(&pool, &blank_title).await.unwrap_err();
    assert_matches!(
        err,
        DbError::Core(CoreError::Validation(ref msg)) if msg == "Event title is required"
    );

    let mut undated = new_event(room.id, owner.id);
    undated.date = None;
    let err = EventRepo::create(&pool, &undated).await.unwrap_err();
    assert_matches!(
        err,
        DbError::Core(CoreError::Validation(ref msg)) if msg == "Event date is required"
    );

    assert_eq!(common::count_rows(&pool, "events").await, 0);

    let event = EventRepo::create(&pool, &new_event(room.id, owner.id))
        .await
        .unwrap();
    assert_eq!(event.duration, 60);
    assert_eq!(
        EventRepo::list_upcoming_for_room(&pool, room.id).await.unwrap().len(),
        1
    );
}

// ---------------------------------------------------------------------------
// Friendships and notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_only_receiver_responds_to_pending_request(pool: PgPool) {
    common::migrate(&pool).await;

    let a = common::create_user(&pool, "Kim").await;
    let b = common::create_user(&pool, "Lee").await;
    let request = FriendshipRepo::request(&pool, a.id, b.id).await.unwrap();
    assert_eq!(request.status, FriendshipStatus::Pending);

    let by_sender = FriendshipRepo::respond(&pool, request.id, a.id, FriendshipStatus::Accepted)
        .await
        .unwrap();
    assert!(by_sender.is_none());

    let accepted = FriendshipRepo::respond(&pool, request.id, b.id, FriendshipStatus::Accepted)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(accepted.status, FriendshipStatus::Accepted);

    let again = FriendshipRepo::respond(&pool, request.id, b.id, FriendshipStatus::Rejected)
        .await
        .unwrap();
    assert!(again.is_none(), "only pending requests can be answered");

    let accepted_for_a = FriendshipRepo::list_for_user(&pool, a.id, Some(FriendshipStatus::Accepted))
        .await
        .unwrap();
    assert_eq!(accepted_for_a.len(), 1);
    let pending_for_b = FriendshipRepo::list_for_user(&pool, b.id, Some(FriendshipStatus::Pending))
        .await
        .unwrap();
    assert!(pending_for_b.is_empty());
    assert_eq!(FriendshipRepo::list_for_user(&pool, b.id, None).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = false)]
async fn test_notifications_read_lifecycle(pool: PgPool) {
    common::migrate(&pool).await;

    let user = common::create_user(&pool, "Mo").await;
    let mut ids = Vec::new();
    for message in ["one", "two", "three"] {
        let n = NotificationRepo::create(
            &pool,
            &CreateNotification {
                user_id: user.id,
                message: message.into(),
                kind: None,
                related_id: None,
                related_type: None,
            },
        )
        .await
        .unwrap();
        ids.push(n.id);
    }

    assert!(NotificationRepo::mark_read(&pool, ids[0], user.id).await.unwrap());
    assert!(!NotificationRepo::mark_read(&pool, ids[0], user.id).await.unwrap());
    assert_eq!(NotificationRepo::list_unread(&pool, user.id).await.unwrap().len(), 2);
    assert_eq!(NotificationRepo::mark_all_read(&pool, user.id).await.unwrap(), 2);
    assert!(NotificationRepo::list_unread(&pool, user.id).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Preferences and presence
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_preferences_defaults_and_update(pool: PgPool) {
    common::migrate(&pool).await;

    let user = common::create_user(&pool, "Noor").await;
    assert!(UserPreferenceRepo::get(&pool, user.id).await.unwrap().is_none());

    let prefs = UserPreferenceRepo::ensure_defaults(&pool, user.id).await.unwrap();
    assert_eq!(prefs.theme, Theme::Light);
    assert_eq!(prefs.timezone, "UTC");

    let again = UserPreferenceRepo::ensure_defaults(&pool, user.id).await.unwrap();
    assert_eq!(again.id, prefs.id);

    let updated = UserPreferenceRepo::update(
        &pool,
        user.id,
        &UpdateUserPreference {
            theme: Some(Theme::Dark),
            language: Some("fr".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.theme, Theme::Dark);
    assert_eq!(updated.language, "fr");
    assert!(updated.notification_push);
}

#[sqlx::test(migrations = false)]
async fn test_presence_keeps_one_row_per_scope(pool: PgPool) {
    common::migrate(&pool).await;

    let user = common::create_user(&pool, "Omar").await;
    let room = common::create_room(&pool, user.id, None).await;

    let site = UserPresenceRepo::set_status(&pool, user.id, None, true, PresenceStatus::Active)
        .await
        .unwrap();
    let site_again = UserPresenceRepo::set_status(&pool, user.id, None, true, PresenceStatus::Away)
        .await
        .unwrap();
    assert_eq!(site.id, site_again.id);
    assert_eq!(site_again.status, PresenceStatus::Away);

    UserPresenceRepo::set_status(&pool, user.id, Some(room.id), true, PresenceStatus::Busy)
        .await
        .unwrap();
    assert_eq!(common::count_rows(&pool, "user_presences").await, 2);

    let online = UserPresenceRepo::list_online(&pool, room.id).await.unwrap();
    assert_eq!(online.len(), 1);
    assert_eq!(online[0].status, PresenceStatus::Busy);

    UserPresenceRepo::set_status(&pool, user.id, Some(room.id), false, PresenceStatus::Away)
        .await
        .unwrap();
    assert!(UserPresenceRepo::list_online(&pool, room.id).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Tasks and resources
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_study_task_lifecycle(pool: PgPool) {
    common::migrate(&pool).await;

    let user = common::create_user(&pool, "Pia").await;
    let first = StudyTaskRepo::create(&pool, &new_task(user.id, "Flashcards"))
        .await
        .unwrap();
    assert_eq!(first.priority, TaskPriority::Medium);
    assert_eq!(first.estimated_time, Some(45));
    let second = StudyTaskRepo::create(&pool, &new_task(user.id, "Essay plan"))
        .await
        .unwrap();

    StudyTaskRepo::update(
        &pool,
        second.id,
        &UpdateStudyTask {
            priority: Some(TaskPriority::High),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    let done = StudyTaskRepo::complete(&pool, first.id, Some(50))
        .await
        .unwrap()
        .unwrap();
    assert!(done.completed);
    assert_eq!(done.actual_time, Some(50));

    let tasks = StudyTaskRepo::list_for_user(&pool, user.id).await.unwrap();
    assert_eq!(tasks[0].id, second.id, "open tasks come first");

    assert!(StudyTaskRepo::delete(&pool, first.id).await.unwrap());
    assert!(StudyTaskRepo::find_by_id(&pool, first.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = false)]
async fn test_resource_type_follows_url(pool: PgPool) {
    common::migrate(&pool).await;

    let user = common::create_user(&pool, "Quinn").await;
    let room = common::create_room(&pool, user.id, None).await;
    let share = |url: Option<&str>, kind: Option<ResourceType>| CreateResource {
        title: "Reading".into(),
        description: None,
        url: url.map(str::to_string),
        kind,
        room_id: room.id,
        uploaded_by: user.id,
    };

    let link = ResourceRepo::create(&pool, &share(Some("https://r.test"), None))
        .await
        .unwrap();
    assert_eq!(link.kind, ResourceType::Link);

    let doc = ResourceRepo::create(&pool, &share(None, None)).await.unwrap();
    assert_eq!(doc.kind, ResourceType::Document);

    let video = ResourceRepo::create(&pool, &share(Some("https://v.test"), Some(ResourceType::Video)))
        .await
        .unwrap();
    assert_eq!(video.kind, ResourceType::Video);

    assert_eq!(ResourceRepo::list_for_room(&pool, room.id).await.unwrap().len(), 3);
}
