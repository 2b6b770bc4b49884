//! Integration tests for the MIT daily-task flow: set, replace, toggle, and
//! history with streaks.

use chrono::{Duration, Utc};
use chrono_tz::Tz;
use daystack::db::repositories::mit_repository::MitRepository;
use daystack::db::DbPool;
use daystack::error::AppError;
use daystack::services::mit_service::MitService;
use tempfile::{tempdir, TempDir};

fn setup() -> (DbPool, MitService, TempDir) {
    let temp_dir = tempdir().expect("temp dir");
    let db = DbPool::new(temp_dir.path().join("test.db")).expect("test database");
    let service = MitService::new(db.clone(), Tz::UTC);
    (db, service, temp_dir)
}

#[test]
fn no_task_until_one_is_set() {
    let (_db, service, _tmp) = setup();
    assert!(service.today_task().unwrap().is_none());

    let record = service.set_today_task("write the report").unwrap();
    assert_eq!(record.task_text, "write the report");
    assert!(!record.completed);
    assert!(service.today_task().unwrap().is_some());
}

#[test]
fn task_text_is_trimmed_and_validated() {
    let (_db, service, _tmp) = setup();

    let record = service.set_today_task("  padded text  ").unwrap();
    assert_eq!(record.task_text, "padded text");

    assert!(matches!(
        service.set_today_task("   "),
        Err(AppError::Validation { .. })
    ));

    let oversized = "x".repeat(501);
    assert!(matches!(
        service.set_today_task(&oversized),
        Err(AppError::Validation { .. })
    ));
}

#[test]
fn replacing_text_keeps_completion() {
    let (_db, service, _tmp) = setup();
    service.set_today_task("first draft").unwrap();
    let toggled = service.toggle_today().unwrap();
    assert!(toggled.completed);

    let replaced = service.set_today_task("second draft").unwrap();
    assert_eq!(replaced.task_text, "second draft");
    assert!(replaced.completed);
}

#[test]
fn toggle_flips_both_ways() {
    let (_db, service, _tmp) = setup();
    service.set_today_task("task").unwrap();

    assert!(service.toggle_today().unwrap().completed);
    assert!(!service.toggle_today().unwrap().completed);
}

#[test]
fn toggle_without_task_is_not_found() {
    let (_db, service, _tmp) = setup();
    assert!(matches!(
        service.toggle_today(),
        Err(AppError::NotFound)
    ));
}

#[test]
fn history_reports_tasks_and_streaks() {
    let (db, service, _tmp) = setup();
    let conn = db.get_connection().unwrap();
    let today = Utc::now().date_naive();
    for offset in 0..4 {
        let date = today - Duration::days(offset);
        MitRepository::upsert_task(&conn, &date, "seeded").unwrap();
        MitRepository::set_completed(&conn, &date, offset != 3).unwrap();
    }

    let history = service.history(10).unwrap();
    assert_eq!(history.tasks.len(), 4);
    assert_eq!(history.current_streak, 3);
    assert_eq!(history.longest_streak, 3);
    // Most recent first.
    assert_eq!(history.tasks[0].task_date, today.to_string());
}

#[test]
fn history_limit_caps_rows_but_not_streaks() {
    let (db, service, _tmp) = setup();
    let conn = db.get_connection().unwrap();
    let today = Utc::now().date_naive();
    for offset in 0..6 {
        let date = today - Duration::days(offset);
        MitRepository::upsert_task(&conn, &date, "seeded").unwrap();
        MitRepository::set_completed(&conn, &date, true).unwrap();
    }

    let history = service.history(2).unwrap();
    assert_eq!(history.tasks.len(), 2);
    assert_eq!(history.current_streak, 6);
}
