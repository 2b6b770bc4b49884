use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::db::repositories::mit_repository::MitRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::mit::{MitHistoryResponse, MitTaskRecord};
use crate::services::streak_engine;

const MAX_TASK_TEXT_CHARS: usize = 500;

/// Write side of the MIT daily feature. One task per calendar date;
/// `completed` is stamped here, the streak engine only reads it.
pub struct MitService {
    db: DbPool,
    timezone: Tz,
}

impl MitService {
    pub fn new(db: DbPool, timezone: Tz) -> Self {
        Self { db, timezone }
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    pub fn today_task(&self) -> AppResult<Option<MitTaskRecord>> {
        let today = self.today();
        self.db
            .with_connection(|conn| MitRepository::find_by_date(conn, &today))
    }

    pub fn set_today_task(&self, task_text: &str) -> AppResult<MitTaskRecord> {
        let trimmed = task_text.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("task_text must not be empty"));
        }
        if trimmed.chars().count() > MAX_TASK_TEXT_CHARS {
            return Err(AppError::validation(format!(
                "task_text exceeds {MAX_TASK_TEXT_CHARS} characters"
            )));
        }

        let today = self.today();
        let record = self
            .db
            .with_connection(|conn| MitRepository::upsert_task(conn, &today, trimmed))?;

        info!(target: "app::mit", date = %today, "MIT task set");
        Ok(record)
    }

    pub fn toggle_today(&self) -> AppResult<MitTaskRecord> {
        let today = self.today();
        let record = self.db.with_connection(|conn| {
            let existing =
                MitRepository::find_by_date(conn, &today)?.ok_or_else(AppError::not_found)?;
            MitRepository::set_completed(conn, &today, !existing.completed)
        })?;

        info!(
            target: "app::mit",
            date = %today,
            completed = record.completed,
            "MIT completion toggled"
        );
        Ok(record)
    }

    pub fn history(&self, limit: usize) -> AppResult<MitHistoryResponse> {
        let (tasks, pairs) = self.db.with_connection(|conn| {
            Ok((
                MitRepository::list_recent(conn, limit)?,
                MitRepository::status_pairs(conn)?,
            ))
        })?;

        let records = streak_engine::parse_records(&pairs);
        let streaks = streak_engine::compute_streaks(&records, self.today());

        Ok(MitHistoryResponse {
            tasks,
            current_streak: streaks.current_streak,
            longest_streak: streaks.longest_streak,
        })
    }
}
