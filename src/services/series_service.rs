use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde_json::json;
use tracing::debug;

use crate::db::repositories::mit_repository::MitRepository;
use crate::db::repositories::output_repository::OutputRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::streak::{
    DailyRecord, SeriesHistoryResponse, SeriesRecordView, StreakSummary,
};
use crate::services::streak_engine;

/// The reserved series name for the Most-Important-Task feature. Any other
/// name resolves to an output type.
pub const MIT_SERIES: &str = "mit";

/// Read-side facade over the two streak-bearing series families. All
/// statistics are recomputed from rows on every call; there is no cached
/// aggregate to go stale.
pub struct SeriesService {
    db: DbPool,
    timezone: Tz,
}

impl SeriesService {
    pub fn new(db: DbPool, timezone: Tz) -> Self {
        Self { db, timezone }
    }

    /// "Today" in the configured reference zone, never the host zone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    pub fn streak_summary(&self, series: &str) -> AppResult<StreakSummary> {
        let records = self.records_for(series)?;
        let today = self.today();
        debug!(
            target: "app::streak",
            %series,
            records = records.len(),
            %today,
            "computing streak summary"
        );
        Ok(streak_engine::summarize(&records, today))
    }

    pub fn history(&self, series: &str, limit: usize) -> AppResult<SeriesHistoryResponse> {
        let records = self.records_for(series)?;
        let streaks = streak_engine::compute_streaks(&records, self.today());

        let views = self.db.with_connection(|conn| {
            if series == MIT_SERIES {
                let tasks = MitRepository::list_recent(conn, limit)?;
                Ok(tasks
                    .into_iter()
                    .map(|task| SeriesRecordView {
                        date: task.task_date,
                        completed: task.completed,
                        value: json!(task.task_text),
                    })
                    .collect::<Vec<_>>())
            } else {
                let output_type = OutputRepository::find_type_by_name(conn, series)?
                    .ok_or_else(AppError::not_found)?;
                let entries = OutputRepository::list_recent_entries(conn, output_type.id, limit)?;
                Ok(entries
                    .into_iter()
                    .map(|entry| SeriesRecordView {
                        date: entry.entry_date,
                        completed: entry.completed,
                        value: json!(entry.count),
                    })
                    .collect::<Vec<_>>())
            }
        })?;

        Ok(SeriesHistoryResponse {
            series: series.to_string(),
            records: views,
            current_streak: streaks.current_streak,
            longest_streak: streaks.longest_streak,
        })
    }

    /// All records for a series. The MIT series always exists (possibly
    /// empty); an output series exists only while its type row does.
    fn records_for(&self, series: &str) -> AppResult<Vec<DailyRecord>> {
        let pairs = self.db.with_connection(|conn| {
            if series == MIT_SERIES {
                MitRepository::status_pairs(conn)
            } else {
                let output_type = OutputRepository::find_type_by_name(conn, series)?
                    .ok_or_else(AppError::not_found)?;
                OutputRepository::status_pairs(conn, output_type.id)
            }
        })?;

        Ok(streak_engine::parse_records(&pairs))
    }
}
