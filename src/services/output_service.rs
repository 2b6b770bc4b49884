use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::db::repositories::output_repository::OutputRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::output::{
    OutputEntryRecord, OutputEntryUpsert, OutputHistoryResponse, OutputTypeInsert,
    OutputTypeRecord,
};
use crate::services::streak_engine;

/// Write side of the output tracker. The target check is the one domain
/// rule: `completed = count >= daily_target`, stamped on every upsert.
pub struct OutputService {
    db: DbPool,
    timezone: Tz,
}

impl OutputService {
    pub fn new(db: DbPool, timezone: Tz) -> Self {
        Self { db, timezone }
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    pub fn create_type(&self, insert: &OutputTypeInsert) -> AppResult<OutputTypeRecord> {
        let name = insert.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        if insert.daily_target < 1 {
            return Err(AppError::validation("daily_target must be at least 1"));
        }

        let sanitized = OutputTypeInsert {
            name: name.to_string(),
            unit: insert.unit.trim().to_string(),
            daily_target: insert.daily_target,
        };

        let record = self
            .db
            .with_connection(|conn| OutputRepository::insert_type(conn, &sanitized))?;

        info!(target: "app::output", name = %record.name, target_value = record.daily_target, "output type created");
        Ok(record)
    }

    pub fn list_types(&self) -> AppResult<Vec<OutputTypeRecord>> {
        self.db.with_connection(OutputRepository::list_types)
    }

    pub fn delete_type(&self, id: i64) -> AppResult<()> {
        self.db
            .with_connection(|conn| OutputRepository::delete_type(conn, id))?;
        info!(target: "app::output", type_id = id, "output type deleted");
        Ok(())
    }

    pub fn log_entry(&self, type_id: i64, upsert: &OutputEntryUpsert) -> AppResult<OutputEntryRecord> {
        if upsert.count < 0 {
            return Err(AppError::validation("count must not be negative"));
        }

        let entry_date = match &upsert.date {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::validation(format!("invalid date: {raw}")))?,
            None => self.today(),
        };

        let record = self.db.with_connection(|conn| {
            let output_type =
                OutputRepository::find_type_by_id(conn, type_id)?.ok_or_else(AppError::not_found)?;
            let completed = upsert.count >= output_type.daily_target;
            OutputRepository::upsert_entry(conn, type_id, &entry_date, upsert.count, completed)
        })?;

        info!(
            target: "app::output",
            type_id,
            date = %entry_date,
            count = record.count,
            completed = record.completed,
            "output entry logged"
        );
        Ok(record)
    }

    pub fn history(&self, type_id: i64, limit: usize) -> AppResult<OutputHistoryResponse> {
        let (entries, pairs) = self.db.with_connection(|conn| {
            OutputRepository::find_type_by_id(conn, type_id)?.ok_or_else(AppError::not_found)?;
            Ok((
                OutputRepository::list_recent_entries(conn, type_id, limit)?,
                OutputRepository::status_pairs(conn, type_id)?,
            ))
        })?;

        let records = streak_engine::parse_records(&pairs);
        let streaks = streak_engine::compute_streaks(&records, self.today());

        Ok(OutputHistoryResponse {
            entries,
            current_streak: streaks.current_streak,
            longest_streak: streaks.longest_streak,
        })
    }
}
