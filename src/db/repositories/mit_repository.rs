use std::convert::TryFrom;

use chrono::NaiveDate;
use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::mit::MitTaskRecord;

#[derive(Debug, Clone)]
pub struct MitTaskRow {
    pub id: i64,
    pub task_date: String,
    pub task_text: String,
    pub completed: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl MitTaskRow {
    pub fn into_record(self) -> MitTaskRecord {
        MitTaskRecord {
            id: self.id,
            task_date: self.task_date,
            task_text: self.task_text,
            completed: self.completed != 0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl TryFrom<&Row<'_>> for MitTaskRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            task_date: row.get("task_date")?,
            task_text: row.get("task_text")?,
            completed: row.get("completed")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct MitRepository;

impl MitRepository {
    /// Set (or replace) the task for a date. A replaced task keeps its
    /// completion flag; changing the text does not un-complete the day.
    pub fn upsert_task(
        conn: &Connection,
        task_date: &NaiveDate,
        task_text: &str,
    ) -> AppResult<MitTaskRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO mit_tasks (task_date, task_text, completed, created_at, updated_at)
                VALUES (:task_date, :task_text, 0, :now, :now)
                ON CONFLICT(task_date) DO UPDATE SET
                    task_text = excluded.task_text,
                    updated_at = excluded.updated_at
            "#,
            named_params! {
                ":task_date": task_date.to_string(),
                ":task_text": task_text,
                ":now": &now,
            },
        )?;

        Self::find_by_date(conn, task_date)?.ok_or_else(AppError::not_found)
    }

    pub fn set_completed(
        conn: &Connection,
        task_date: &NaiveDate,
        completed: bool,
    ) -> AppResult<MitTaskRecord> {
        let now = chrono::Utc::now().to_rfc3339();
        let updated = conn.execute(
            r#"
                UPDATE mit_tasks
                SET completed = :completed, updated_at = :now
                WHERE task_date = :task_date
            "#,
            named_params! {
                ":completed": completed as i64,
                ":now": &now,
                ":task_date": task_date.to_string(),
            },
        )?;

        if updated == 0 {
            return Err(AppError::not_found());
        }

        Self::find_by_date(conn, task_date)?.ok_or_else(AppError::not_found)
    }

    pub fn find_by_date(
        conn: &Connection,
        task_date: &NaiveDate,
    ) -> AppResult<Option<MitTaskRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, task_date, task_text, completed, created_at, updated_at
                FROM mit_tasks
                WHERE task_date = :task_date
            "#,
        )?;

        let row = stmt
            .query_row(named_params! {":task_date": task_date.to_string()}, |row| {
                MitTaskRow::try_from(row)
            })
            .optional()?;

        Ok(row.map(MitTaskRow::into_record))
    }

    pub fn list_recent(conn: &Connection, limit: usize) -> AppResult<Vec<MitTaskRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, task_date, task_text, completed, created_at, updated_at
                FROM mit_tasks
                ORDER BY task_date DESC
                LIMIT :limit
            "#,
        )?;

        let rows = stmt
            .query_map(named_params! {":limit": limit as i64}, |row| {
                MitTaskRow::try_from(row)
            })?
            .map(|row| row.map(MitTaskRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    /// `(date, completed)` pairs over all history, raw strings as stored.
    /// Date parsing (and skipping of corrupt rows) happens in the engine.
    pub fn status_pairs(conn: &Connection) -> AppResult<Vec<(String, bool)>> {
        let mut stmt =
            conn.prepare("SELECT task_date, completed FROM mit_tasks ORDER BY task_date DESC")?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? != 0))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
