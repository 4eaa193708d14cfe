mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;
use studyconnect_core::password::verify_password;
use studyconnect_db::error::is_unique_violation;
use studyconnect_db::models::enums::{Theme, UserRole};
use studyconnect_db::repositories::{UserPreferenceRepo, UserRepo};
use studyconnect_db::seed::{seed_admin, unseed_admin, AdminSeed, SeedError, DEFAULT_ADMIN_EMAIL};

fn admin() -> AdminSeed {
    AdminSeed::from_lookup(|key| match key {
        "SEED_ADMIN_PASSWORD" => Some("bootstrap-secret".to_string()),
        _ => None,
    })
    .unwrap()
}

#[sqlx::test(migrations = false)]
async fn test_seed_creates_admin_with_preferences(pool: PgPool) {
    common::migrate(&pool).await;

    let id = seed_admin(&pool, &admin()).await.unwrap();

    let user = UserRepo::find_by_email(&pool, DEFAULT_ADMIN_EMAIL)
        .await
        .unwrap()
        .expect("admin should exist");
    assert_eq!(user.id, id);
    assert_eq!(user.role, UserRole::Admin);
    assert!(user.is_active);
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert!(verify_password("bootstrap-secret", &user.password_hash).unwrap());

    let prefs = UserPreferenceRepo::get(&pool, id).await.unwrap().unwrap();
    assert_eq!(prefs.theme, Theme::Light);
    assert!(prefs.notification_email);
    assert_eq!(prefs.language, "en");
}

#[sqlx::test(migrations = false)]
async fn test_seeding_twice_violates_email_uniqueness(pool: PgPool) {
    common::migrate(&pool).await;

    seed_admin(&pool, &admin()).await.unwrap();
    let err = seed_admin(&pool, &admin()).await.unwrap_err();
    assert_matches!(err, SeedError::Database(ref e) if is_unique_violation(e, "uq_users_email"));

    // The failed run left nothing behind.
    assert_eq!(common::count_rows(&pool, "users").await, 1);
    assert_eq!(common::count_rows(&pool, "user_preferences").await, 1);
}

#[sqlx::test(migrations = false)]
async fn test_unseed_removes_admin_and_preferences(pool: PgPool) {
    common::migrate(&pool).await;

    seed_admin(&pool, &admin()).await.unwrap();
    assert!(unseed_admin(&pool, DEFAULT_ADMIN_EMAIL).await.unwrap());
    assert_eq!(common::count_rows(&pool, "users").await, 0);
    assert_eq!(common::count_rows(&pool, "user_preferences").await, 0);

    // Removal makes the seed runnable again.
    assert!(!unseed_admin(&pool, DEFAULT_ADMIN_EMAIL).await.unwrap());
    seed_admin(&pool, &admin()).await.unwrap();
}

#[sqlx::test(migrations = false)]
async fn test_weak_password_is_rejected_before_writing(pool: PgPool) {
    common::migrate(&pool).await;

    let weak = AdminSeed {
        password: "short".into(),
        ..admin()
    };
    assert_matches!(seed_admin(&pool, &weak).await, Err(SeedError::Core(_)));
    assert_eq!(common::count_rows(&pool, "users").await, 0);
}
