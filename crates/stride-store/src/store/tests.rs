use super::Store;
use crate::NewUser;
use chrono::NaiveDate;
use stride_core::error::StrideError;
use stride_core::types::{Source, TaskSelection, TaskStreakState};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

async fn test_store() -> Store {
    Store::in_memory().await.unwrap()
}

fn sample_user() -> NewUser {
    NewUser {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "+15550001111".to_string(),
        selection: TaskSelection {
            career: vec!["github".to_string()],
            personal: vec!["gym".to_string(), "yoga".to_string()],
            custom: vec![],
        },
        min_tasks_required: 2,
    }
}

#[tokio::test]
async fn test_set_completion_upserts_single_row() {
    let store = test_store().await;
    let d = day("2026-03-01");

    let first = store
        .set_completion("u1", "github", d, true, Source::Interactive)
        .await
        .unwrap();
    assert!(first.completed);
    assert_eq!(first.source, Source::Interactive);

    // Second write on the same key overwrites in place.
    let second = store
        .set_completion("u1", "github", d, false, Source::Messaging)
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert!(!second.completed);
    assert_eq!(second.source, Source::Messaging);

    let all = store
        .find_by_user_and_date_range("u1", d, d)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_set_completion_rejects_empty_task_id() {
    let store = test_store().await;
    let err = store
        .set_completion("u1", "  ", day("2026-03-01"), true, Source::Interactive)
        .await
        .unwrap_err();
    assert!(matches!(err, StrideError::Validation(_)));
}

#[tokio::test]
async fn test_range_query_is_inclusive_and_ordered() {
    let store = test_store().await;
    for (d, task) in [
        ("2026-03-01", "gym"),
        ("2026-03-02", "github"),
        ("2026-03-03", "gym"),
        ("2026-03-05", "gym"),
    ] {
        store
            .set_completion("u1", task, day(d), true, Source::Interactive)
            .await
            .unwrap();
    }

    let records = store
        .find_by_user_and_date_range("u1", day("2026-03-01"), day("2026-03-03"))
        .await
        .unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].date, day("2026-03-01"));
    assert_eq!(records[2].date, day("2026-03-03"));
}

#[tokio::test]
async fn test_count_completed_ignores_uncompleted() {
    let store = test_store().await;
    let d = day("2026-03-01");
    store
        .set_completion("u1", "gym", d, true, Source::Interactive)
        .await
        .unwrap();
    store
        .set_completion("u1", "yoga", d, false, Source::Interactive)
        .await
        .unwrap();

    assert_eq!(store.count_completed("u1", d).await.unwrap(), 1);
}

#[tokio::test]
async fn test_task_streak_roundtrip() {
    let store = test_store().await;

    // Absent row reads as zeros.
    let fresh = store.get_task_streak("u1", "gym").await.unwrap();
    assert_eq!(fresh.current_streak, 0);
    assert!(fresh.last_completed.is_none());

    let state = TaskStreakState {
        current_streak: 4,
        best_streak: 9,
        total_days: 20,
        last_completed: Some(day("2026-03-01")),
    };
    store.save_task_streak("u1", "gym", &state).await.unwrap();

    let loaded = store.get_task_streak("u1", "gym").await.unwrap();
    assert_eq!(loaded.current_streak, 4);
    assert_eq!(loaded.best_streak, 9);
    assert_eq!(loaded.last_completed, Some(day("2026-03-01")));

    // Upsert, not append.
    store.save_task_streak("u1", "gym", &state).await.unwrap();
    let all = store.get_all_task_streaks("u1").await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].0, "gym");
}

#[tokio::test]
async fn test_user_roundtrip_and_phone_lookup() {
    let store = test_store().await;
    let id = store.create_user(&sample_user()).await.unwrap();

    let user = store.get_user(&id).await.unwrap();
    assert_eq!(user.first_name, "Ada");
    assert_eq!(
        user.selection.ordinal_tasks(),
        vec!["github", "gym", "yoga"]
    );
    assert_eq!(user.min_tasks_required, 2);
    assert_eq!(user.global_streak.current_streak, 0);

    // Lookup works with and without a channel prefix.
    let by_plain = store.find_user_by_phone("+15550001111").await.unwrap();
    assert!(by_plain.is_some());
    let by_prefixed = store
        .find_user_by_phone("whatsapp:+15550001111")
        .await
        .unwrap();
    assert_eq!(by_prefixed.unwrap().id, id);

    assert!(store
        .find_user_by_phone("+19999999999")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let store = test_store().await;
    let err = store.get_user("missing").await.unwrap_err();
    assert!(matches!(err, StrideError::NotFound(_)));
}

#[tokio::test]
async fn test_min_tasks_required_validation() {
    let store = test_store().await;
    let id = store.create_user(&sample_user()).await.unwrap();

    let err = store.set_min_tasks_required(&id, 0).await.unwrap_err();
    assert!(matches!(err, StrideError::Validation(_)));

    store.set_min_tasks_required(&id, 5).await.unwrap();
    assert_eq!(store.get_user(&id).await.unwrap().min_tasks_required, 5);
}

#[tokio::test]
async fn test_global_streak_persists_on_profile() {
    let store = test_store().await;
    let id = store.create_user(&sample_user()).await.unwrap();

    let mut user = store.get_user(&id).await.unwrap();
    user.global_streak.current_streak = 3;
    user.global_streak.best_streak = 7;
    user.global_streak.last_completed = Some(day("2026-03-02"));
    store
        .save_global_streak(&id, &user.global_streak)
        .await
        .unwrap();

    let reloaded = store.get_user(&id).await.unwrap();
    assert_eq!(reloaded.global_streak.current_streak, 3);
    assert_eq!(reloaded.global_streak.best_streak, 7);
    assert_eq!(
        reloaded.global_streak.last_completed,
        Some(day("2026-03-02"))
    );
}

#[tokio::test]
async fn test_poll_response_roundtrip() {
    let store = test_store().await;
    let d = day("2026-03-01");

    store
        .record_poll_response("u1", d, &["github".to_string()], "1")
        .await
        .unwrap();
    store
        .record_poll_response("u1", d, &[], "none")
        .await
        .unwrap();

    let rows = store.poll_responses_for_day("u1", d).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].responses, vec!["github"]);
    assert_eq!(rows[1].raw_message, "none");
    assert!(rows[1].responses.is_empty());
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    // Re-running against an already-migrated pool is a no-op.
    Store::run_migrations(store.pool()).await.unwrap();

    let applied: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(applied.0, 2);
}
