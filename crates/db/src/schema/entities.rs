//! Stored shape of every StudyConnect table after the full migration log.

use super::CascadePolicy::{Cascade, SetNull};
use super::SqlType::{Boolean, Integer, Text, Timestamptz, Uuid};
use super::{EntityDef, FieldDef, RelationDef};
use crate::models::enums::{
    AttendanceStatus, FriendshipStatus, NotificationType, PresenceStatus, ProficiencyLevel,
    ResourceType, RoomRole, TaskPriority, Theme, UserRole,
};

const ID: FieldDef = FieldDef::required("id", Uuid).default_expr("gen_random_uuid()");
const CREATED_AT: FieldDef = FieldDef::required("created_at", Timestamptz).default_expr("now()");
const UPDATED_AT: FieldDef = FieldDef::required("updated_at", Timestamptz).default_expr("now()");

pub const USERS: EntityDef = EntityDef {
    name: "User",
    table: "users",
    fields: &[
        ID,
        FieldDef::required("name", Text),
        FieldDef::required("email", Text).unique(),
        FieldDef::required("password_hash", Text),
        FieldDef::required("role", Text)
            .default_text("student")
            .domain(UserRole::ALL),
        FieldDef::required("is_active", Boolean).default_expr("true"),
        FieldDef::optional("last_login_at", Timestamptz),
        FieldDef::optional("avatar_url", Text),
        FieldDef::optional("bio", Text),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[
        RelationDef::has_many("tasks", "study_tasks", "user_id", Cascade),
        RelationDef::has_many("messages", "messages", "sender_id", Cascade),
        RelationDef::has_many("notifications", "notifications", "user_id", Cascade),
        RelationDef::has_one("preference", "user_preferences", "user_id", Cascade),
        RelationDef::has_many("presences", "user_presences", "user_id", Cascade),
        RelationDef::has_many("sent_direct_messages", "direct_messages", "sender_id", Cascade),
        RelationDef::has_many(
            "received_direct_messages",
            "direct_messages",
            "receiver_id",
            Cascade,
        ),
        RelationDef::has_many("sent_friend_requests", "friendships", "sender_id", Cascade),
        RelationDef::has_many("received_friend_requests", "friendships", "receiver_id", Cascade),
        RelationDef::has_many("created_rooms", "study_rooms", "created_by", Cascade),
        RelationDef::has_many("created_events", "events", "created_by", Cascade),
        RelationDef::has_many("flashcard_decks", "flashcard_decks", "owner_id", Cascade),
        RelationDef::has_many("resources", "resources", "uploaded_by", Cascade),
        RelationDef::has_many("room_memberships", "user_study_rooms", "user_id", Cascade),
        RelationDef::has_many("subject_links", "user_subjects", "user_id", Cascade),
        RelationDef::has_many("event_responses", "user_events", "user_id", Cascade),
        RelationDef::many_to_many("events", "events", "user_events", "user_id", "event_id"),
        RelationDef::many_to_many(
            "study_rooms",
            "study_rooms",
            "user_study_rooms",
            "user_id",
            "room_id",
        ),
        RelationDef::many_to_many("subjects", "subjects", "user_subjects", "user_id", "subject_id"),
    ],
};

pub const SUBJECTS: EntityDef = EntityDef {
    name: "Subject",
    table: "subjects",
    fields: &[
        ID,
        FieldDef::required("name", Text).unique(),
        FieldDef::optional("category", Text),
        FieldDef::optional("description", Text),
        FieldDef::optional("icon", Text),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[
        RelationDef::has_many("flashcard_decks", "flashcard_decks", "subject_id", SetNull),
        RelationDef::has_many("study_rooms", "study_rooms", "subject_id", SetNull),
        RelationDef::has_many("user_links", "user_subjects", "subject_id", Cascade),
        RelationDef::many_to_many("users", "users", "user_subjects", "subject_id", "user_id"),
    ],
};

pub const STUDY_ROOMS: EntityDef = EntityDef {
    name: "StudyRoom",
    table: "study_rooms",
    fields: &[
        ID,
        FieldDef::required("name", Text),
        FieldDef::optional("description", Text),
        FieldDef::optional("subject_id", Uuid),
        FieldDef::required("created_by", Uuid),
        FieldDef::required("is_private", Boolean).default_expr("false"),
        FieldDef::required("max_members", Integer).default_expr("10"),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[
        RelationDef::belongs_to("subject", "subjects", "subject_id", SetNull),
        RelationDef::belongs_to("creator", "users", "created_by", Cascade),
        RelationDef::has_many("messages", "messages", "room_id", Cascade),
        RelationDef::has_many("events", "events", "room_id", Cascade),
        RelationDef::has_many("presences", "user_presences", "room_id", Cascade),
        RelationDef::has_many("resources", "resources", "room_id", Cascade),
        RelationDef::has_many("memberships", "user_study_rooms", "room_id", Cascade),
        RelationDef::many_to_many("members", "users", "user_study_rooms", "room_id", "user_id"),
    ],
};

pub const USER_STUDY_ROOMS: EntityDef = EntityDef {
    name: "UserStudyRoom",
    table: "user_study_rooms",
    fields: &[
        ID,
        FieldDef::required("user_id", Uuid),
        FieldDef::required("room_id", Uuid),
        FieldDef::required("role", Text)
            .default_text("member")
            .domain(RoomRole::ALL),
        FieldDef::required("joined_at", Timestamptz).default_expr("now()"),
        FieldDef::optional("last_active", Timestamptz),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[&["user_id", "room_id"]],
    relations: &[
        RelationDef::belongs_to("user", "users", "user_id", Cascade),
        RelationDef::belongs_to("room", "study_rooms", "room_id", Cascade),
    ],
};

pub const USER_SUBJECTS: EntityDef = EntityDef {
    name: "UserSubject",
    table: "user_subjects",
    fields: &[
        ID,
        FieldDef::required("user_id", Uuid),
        FieldDef::required("subject_id", Uuid),
        FieldDef::required("proficiency_level", Text)
            .default_text("beginner")
            .domain(ProficiencyLevel::ALL),
        FieldDef::required("is_teaching", Boolean).default_expr("false"),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[&["user_id", "subject_id"]],
    relations: &[
        RelationDef::belongs_to("user", "users", "user_id", Cascade),
        RelationDef::belongs_to("subject", "subjects", "subject_id", Cascade),
    ],
};

pub const MESSAGES: EntityDef = EntityDef {
    name: "Message",
    table: "messages",
    fields: &[
        ID,
        FieldDef::required("content", Text),
        FieldDef::required("room_id", Uuid),
        FieldDef::required("sender_id", Uuid),
        FieldDef::required("is_system", Boolean).default_expr("false"),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[
        RelationDef::belongs_to("sender", "users", "sender_id", Cascade),
        RelationDef::belongs_to("room", "study_rooms", "room_id", Cascade),
    ],
};

pub const DIRECT_MESSAGES: EntityDef = EntityDef {
    name: "DirectMessage",
    table: "direct_messages",
    fields: &[
        ID,
        FieldDef::required("content", Text),
        FieldDef::required("sender_id", Uuid),
        FieldDef::required("receiver_id", Uuid),
        FieldDef::required("is_read", Boolean).default_expr("false"),
        FieldDef::optional("read_at", Timestamptz),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[
        RelationDef::belongs_to("sender", "users", "sender_id", Cascade),
        RelationDef::belongs_to("receiver", "users", "receiver_id", Cascade),
    ],
};

pub const EVENTS: EntityDef = EntityDef {
    name: "Event",
    table: "events",
    fields: &[
        ID,
        FieldDef::required("title", Text),
        FieldDef::optional("description", Text),
        FieldDef::required("date", Timestamptz),
        FieldDef::required("duration", Integer).default_expr("60"),
        FieldDef::required("room_id", Uuid),
        FieldDef::required("created_by", Uuid),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[
        RelationDef::belongs_to("room", "study_rooms", "room_id", Cascade),
        RelationDef::belongs_to("creator", "users", "created_by", Cascade),
        RelationDef::has_many("responses", "user_events", "event_id", Cascade),
        RelationDef::many_to_many("attendees", "users", "user_events", "event_id", "user_id"),
    ],
};

pub const USER_EVENTS: EntityDef = EntityDef {
    name: "UserEvent",
    table: "user_events",
    fields: &[
        ID,
        FieldDef::required("user_id", Uuid),
        FieldDef::required("event_id", Uuid),
        FieldDef::required("status", Text)
            .default_text("attending")
            .domain(AttendanceStatus::ALL),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[&["user_id", "event_id"]],
    relations: &[
        RelationDef::belongs_to("user", "users", "user_id", Cascade),
        RelationDef::belongs_to("event", "events", "event_id", Cascade),
    ],
};

pub const FRIENDSHIPS: EntityDef = EntityDef {
    name: "Friendship",
    table: "friendships",
    fields: &[
        ID,
        FieldDef::required("sender_id", Uuid),
        FieldDef::required("receiver_id", Uuid),
        FieldDef::required("status", Text)
            .default_text("pending")
            .domain(FriendshipStatus::ALL),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[&["sender_id", "receiver_id"]],
    relations: &[
        RelationDef::belongs_to("sender", "users", "sender_id", Cascade),
        RelationDef::belongs_to("receiver", "users", "receiver_id", Cascade),
    ],
};

pub const NOTIFICATIONS: EntityDef = EntityDef {
    name: "Notification",
    table: "notifications",
    fields: &[
        ID,
        FieldDef::required("user_id", Uuid),
        FieldDef::required("message", Text),
        FieldDef::required("type", Text)
            .default_text("info")
            .domain(NotificationType::ALL),
        FieldDef::required("is_read", Boolean).default_expr("false"),
        FieldDef::optional("related_id", Uuid),
        FieldDef::optional("related_type", Text),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[RelationDef::belongs_to("user", "users", "user_id", Cascade)],
};

pub const USER_PREFERENCES: EntityDef = EntityDef {
    name: "UserPreference",
    table: "user_preferences",
    fields: &[
        ID,
        FieldDef::required("user_id", Uuid).unique(),
        FieldDef::required("notification_email", Boolean).default_expr("true"),
        FieldDef::required("notification_push", Boolean).default_expr("true"),
        FieldDef::required("theme", Text)
            .default_text("light")
            .domain(Theme::ALL),
        FieldDef::required("language", Text).default_text("en"),
        FieldDef::required("timezone", Text).default_text("UTC"),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[RelationDef::belongs_to("user", "users", "user_id", Cascade)],
};

pub const USER_PRESENCES: EntityDef = EntityDef {
    name: "UserPresence",
    table: "user_presences",
    fields: &[
        ID,
        FieldDef::required("user_id", Uuid),
        FieldDef::optional("room_id", Uuid),
        FieldDef::required("is_online", Boolean).default_expr("false"),
        FieldDef::required("last_active", Timestamptz).default_expr("now()"),
        FieldDef::required("status", Text)
            .default_text("active")
            .domain(PresenceStatus::ALL),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[
        RelationDef::belongs_to("user", "users", "user_id", Cascade),
        RelationDef::belongs_to("room", "study_rooms", "room_id", Cascade),
    ],
};

pub const STUDY_TASKS: EntityDef = EntityDef {
    name: "StudyTask",
    table: "study_tasks",
    fields: &[
        ID,
        FieldDef::required("user_id", Uuid),
        FieldDef::required("title", Text),
        FieldDef::optional("description", Text),
        FieldDef::required("completed", Boolean).default_expr("false"),
        FieldDef::optional("due_date", Timestamptz),
        FieldDef::required("priority", Text)
            .default_text("medium")
            .domain(TaskPriority::ALL),
        FieldDef::optional("estimated_time", Integer),
        FieldDef::optional("actual_time", Integer),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[RelationDef::belongs_to("user", "users", "user_id", Cascade)],
};

pub const FLASHCARD_DECKS: EntityDef = EntityDef {
    name: "FlashcardDeck",
    table: "flashcard_decks",
    fields: &[
        ID,
        FieldDef::required("title", Text),
        FieldDef::optional("description", Text),
        FieldDef::required("is_public", Boolean).default_expr("false"),
        FieldDef::optional("subject_id", Uuid),
        FieldDef::required("owner_id", Uuid),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[
        RelationDef::belongs_to("subject", "subjects", "subject_id", SetNull),
        RelationDef::belongs_to("owner", "users", "owner_id", Cascade),
        RelationDef::has_many("cards", "flashcards", "deck_id", Cascade),
    ],
};

pub const FLASHCARDS: EntityDef = EntityDef {
    name: "Flashcard",
    table: "flashcards",
    fields: &[
        ID,
        FieldDef::required("deck_id", Uuid),
        FieldDef::required("front", Text),
        FieldDef::required("back", Text),
        FieldDef::required("position", Integer).default_expr("0"),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[RelationDef::belongs_to("deck", "flashcard_decks", "deck_id", Cascade)],
};

pub const RESOURCES: EntityDef = EntityDef {
    name: "Resource",
    table: "resources",
    fields: &[
        ID,
        FieldDef::required("title", Text),
        FieldDef::optional("description", Text),
        FieldDef::optional("url", Text),
        FieldDef::required("type", Text)
            .default_text("Document")
            .domain(ResourceType::ALL),
        FieldDef::required("room_id", Uuid),
        FieldDef::required("uploaded_by", Uuid),
        CREATED_AT,
        UPDATED_AT,
    ],
    unique_together: &[],
    relations: &[
        RelationDef::belongs_to("room", "study_rooms", "room_id", Cascade),
        RelationDef::belongs_to("uploader", "users", "uploaded_by", Cascade),
    ],
};

/// Every entity, parents before children.
pub static ALL_ENTITIES: &[&EntityDef] = &[
    &USERS,
    &SUBJECTS,
    &STUDY_ROOMS,
    &USER_STUDY_ROOMS,
    &USER_SUBJECTS,
    &MESSAGES,
    &DIRECT_MESSAGES,
    &EVENTS,
    &USER_EVENTS,
    &FRIENDSHIPS,
    &NOTIFICATIONS,
    &USER_PREFERENCES,
    &USER_PRESENCES,
    &STUDY_TASKS,
    &FLASHCARD_DECKS,
    &FLASHCARDS,
    &RESOURCES,
];
