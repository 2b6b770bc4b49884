//! Integration tests for the output tracker: type lifecycle, entry upserts,
//! and target-based completion stamping.

use chrono::{Duration, Utc};
use chrono_tz::Tz;
use daystack::db::repositories::output_repository::OutputRepository;
use daystack::db::DbPool;
use daystack::error::AppError;
use daystack::models::output::{OutputEntryUpsert, OutputTypeInsert};
use daystack::services::output_service::OutputService;
use tempfile::{tempdir, TempDir};

fn setup() -> (DbPool, OutputService, TempDir) {
    let temp_dir = tempdir().expect("temp dir");
    let db = DbPool::new(temp_dir.path().join("test.db")).expect("test database");
    let service = OutputService::new(db.clone(), Tz::UTC);
    (db, service, temp_dir)
}

fn words_type(service: &OutputService) -> i64 {
    service
        .create_type(&OutputTypeInsert {
            name: "words".to_string(),
            unit: "words".to_string(),
            daily_target: 500,
        })
        .unwrap()
        .id
}

#[test]
fn type_creation_validates_and_lists() {
    let (_db, service, _tmp) = setup();

    assert!(matches!(
        service.create_type(&OutputTypeInsert {
            name: "  ".to_string(),
            unit: String::new(),
            daily_target: 1,
        }),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        service.create_type(&OutputTypeInsert {
            name: "words".to_string(),
            unit: String::new(),
            daily_target: 0,
        }),
        Err(AppError::Validation { .. })
    ));

    words_type(&service);
    let types = service.list_types().unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].name, "words");
}

#[test]
fn duplicate_type_name_is_a_conflict() {
    let (_db, service, _tmp) = setup();
    words_type(&service);

    let result = service.create_type(&OutputTypeInsert {
        name: "words".to_string(),
        unit: "words".to_string(),
        daily_target: 250,
    });
    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[test]
fn entry_completion_follows_daily_target() {
    let (_db, service, _tmp) = setup();
    let type_id = words_type(&service);

    let below = service
        .log_entry(type_id, &OutputEntryUpsert { date: None, count: 499 })
        .unwrap();
    assert!(!below.completed);

    let at_target = service
        .log_entry(type_id, &OutputEntryUpsert { date: None, count: 500 })
        .unwrap();
    assert!(at_target.completed);
    // Same day upserted, not duplicated.
    assert_eq!(at_target.id, below.id);
}

#[test]
fn entry_validation_rejects_bad_input() {
    let (_db, service, _tmp) = setup();
    let type_id = words_type(&service);

    assert!(matches!(
        service.log_entry(type_id, &OutputEntryUpsert { date: None, count: -1 }),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        service.log_entry(
            type_id,
            &OutputEntryUpsert {
                date: Some("2026/01/01".to_string()),
                count: 10,
            }
        ),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        service.log_entry(9999, &OutputEntryUpsert { date: None, count: 10 }),
        Err(AppError::NotFound)
    ));
}

#[test]
fn backfilled_dates_count_toward_streaks() {
    let (_db, service, _tmp) = setup();
    let type_id = words_type(&service);
    let today = Utc::now().date_naive();

    for offset in 0..3 {
        let date = (today - Duration::days(offset)).to_string();
        service
            .log_entry(
                type_id,
                &OutputEntryUpsert {
                    date: Some(date),
                    count: 600,
                },
            )
            .unwrap();
    }

    let history = service.history(type_id, 10).unwrap();
    assert_eq!(history.entries.len(), 3);
    assert_eq!(history.current_streak, 3);
    assert_eq!(history.longest_streak, 3);
}

#[test]
fn raising_a_count_can_complete_the_day() {
    let (_db, service, _tmp) = setup();
    let type_id = words_type(&service);

    service
        .log_entry(type_id, &OutputEntryUpsert { date: None, count: 100 })
        .unwrap();
    let updated = service
        .log_entry(type_id, &OutputEntryUpsert { date: None, count: 700 })
        .unwrap();

    assert_eq!(updated.count, 700);
    assert!(updated.completed);
}

#[test]
fn deleting_a_type_removes_its_entries() {
    let (db, service, _tmp) = setup();
    let type_id = words_type(&service);
    service
        .log_entry(type_id, &OutputEntryUpsert { date: None, count: 600 })
        .unwrap();

    service.delete_type(type_id).unwrap();

    assert!(matches!(
        service.history(type_id, 10),
        Err(AppError::NotFound)
    ));
    let conn = db.get_connection().unwrap();
    let orphans: i64 = conn
        .query_row("SELECT COUNT(*) FROM output_entries", [], |row| row.get(0))
        .unwrap();
    assert_eq!(orphans, 0);

    assert!(matches!(service.delete_type(type_id), Err(AppError::NotFound)));
}

#[test]
fn history_for_unknown_type_is_not_found() {
    let (_db, service, _tmp) = setup();
    assert!(matches!(service.history(42, 10), Err(AppError::NotFound)));
}

#[test]
fn repository_preserves_entry_ordering() {
    let (db, service, _tmp) = setup();
    let type_id = words_type(&service);
    let conn = db.get_connection().unwrap();
    let today = Utc::now().date_naive();

    OutputRepository::upsert_entry(&conn, type_id, &(today - Duration::days(2)), 600, true)
        .unwrap();
    OutputRepository::upsert_entry(&conn, type_id, &today, 100, false).unwrap();

    let entries = OutputRepository::list_recent_entries(&conn, type_id, 10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].entry_date, today.to_string());
}
