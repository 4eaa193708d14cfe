//! The ordered migration log.
//!
//! Append only. New entries go at the end with a later timestamp; applied
//! entries are never edited. Domain changes on `TEXT` + `CHECK` columns may
//! only widen: narrowing goes through widen, migrate data, then narrow.

use super::{Forward, Migration, Reverse};
use crate::repair::RepairJob;

macro_rules! sql_migration {
    ($name:literal) => {
        Migration {
            name: $name,
            up: Forward::Sql(include_str!(concat!("../../migrations/", $name, ".up.sql"))),
            down: Reverse::Sql(include_str!(concat!("../../migrations/", $name, ".down.sql"))),
        }
    };
}

pub static MIGRATIONS: &[Migration] = &[
    sql_migration!("20240101000000_create_updated_at_function"),
    sql_migration!("20240101000001_create_users"),
    sql_migration!("20240101000002_create_subjects"),
    sql_migration!("20240101000003_create_study_rooms"),
    sql_migration!("20240101000004_create_user_study_rooms"),
    sql_migration!("20240101000005_create_user_subjects"),
    sql_migration!("20240101000006_create_messages"),
    sql_migration!("20240101000007_create_direct_messages"),
    sql_migration!("20240101000008_create_events"),
    sql_migration!("20240101000009_create_user_events"),
    sql_migration!("20240101000010_create_friendships"),
    sql_migration!("20240101000011_create_notifications"),
    sql_migration!("20240101000012_create_user_preferences"),
    sql_migration!("20240101000013_create_user_presences"),
    sql_migration!("20240101000014_create_study_tasks"),
    sql_migration!("20240101000015_create_flashcard_decks"),
    sql_migration!("20240101000016_create_resources"),
    sql_migration!("20240201000001_add_profile_fields_to_users"),
    sql_migration!("20240201000002_change_study_task_times_to_minutes"),
    sql_migration!("20240201000003_add_message_indexes"),
    sql_migration!("20240215000001_create_user_preferences"),
    Migration {
        name: "20240301000001_widen_resource_type_domain",
        up: Forward::Sql(include_str!(
            "../../migrations/20240301000001_widen_resource_type_domain.up.sql"
        )),
        down: Reverse::Irreversible {
            reason: "narrowing ck_resources_type would reject rows already classified as 'Link'",
        },
    },
    Migration {
        name: "20240301000002_repair_resource_types",
        up: Forward::Repair(RepairJob::ResourceTypes),
        down: Reverse::Irreversible {
            reason: "the repair does not record the type each row had before it was corrected",
        },
    },
    sql_migration!("20240401000001_add_read_at_to_direct_messages"),
];
