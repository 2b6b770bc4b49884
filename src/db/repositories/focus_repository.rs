use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::focus::{FocusDayTotals, FocusKind, FocusSessionInsert, FocusSessionRecord};

#[derive(Debug, Clone)]
pub struct FocusSessionRow {
    pub id: i64,
    pub kind: String,
    pub started_at: String,
    pub planned_minutes: i64,
    pub actual_minutes: i64,
    pub completed: i64,
}

impl FocusSessionRow {
    pub fn into_record(self) -> AppResult<FocusSessionRecord> {
        let kind = FocusKind::try_from(self.kind.as_str()).map_err(AppError::validation)?;

        Ok(FocusSessionRecord {
            id: self.id,
            kind,
            started_at: self.started_at,
            planned_minutes: self.planned_minutes,
            actual_minutes: self.actual_minutes,
            completed: self.completed != 0,
        })
    }
}

impl TryFrom<&Row<'_>> for FocusSessionRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            kind: row.get("kind")?,
            started_at: row.get("started_at")?,
            planned_minutes: row.get("planned_minutes")?,
            actual_minutes: row.get("actual_minutes")?,
            completed: row.get("completed")?,
        })
    }
}

pub struct FocusRepository;

impl FocusRepository {
    pub fn insert(conn: &Connection, insert: &FocusSessionInsert) -> AppResult<FocusSessionRecord> {
        conn.execute(
            r#"
                INSERT INTO focus_sessions (kind, started_at, planned_minutes, actual_minutes, completed)
                VALUES (:kind, :started_at, :planned_minutes, :actual_minutes, :completed)
            "#,
            named_params! {
                ":kind": insert.kind.as_str(),
                ":started_at": &insert.started_at,
                ":planned_minutes": insert.planned_minutes,
                ":actual_minutes": insert.actual_minutes,
                ":completed": insert.completed as i64,
            },
        )?;

        let id = conn.last_insert_rowid();
        Self::find_by_id(conn, id)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<FocusSessionRecord> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, kind, started_at, planned_minutes, actual_minutes, completed
                FROM focus_sessions
                WHERE id = :id
            "#,
        )?;

        let row = stmt
            .query_row(named_params! {":id": id}, |row| {
                FocusSessionRow::try_from(row)
            })
            .optional()?;

        row.map(FocusSessionRow::into_record)
            .transpose()?
            .ok_or_else(AppError::not_found)
    }

    pub fn list_recent(conn: &Connection, limit: usize) -> AppResult<Vec<FocusSessionRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, kind, started_at, planned_minutes, actual_minutes, completed
                FROM focus_sessions
                ORDER BY started_at DESC
                LIMIT :limit
            "#,
        )?;

        let rows = stmt
            .query_map(named_params! {":limit": limit as i64}, |row| {
                FocusSessionRow::try_from(row)
            })?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(FocusSessionRow::into_record)
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    /// Per-day totals over the last `days` distinct session dates.
    /// `started_at` is RFC 3339, so the leading 10 chars are the ISO date.
    pub fn daily_totals(conn: &Connection, days: usize) -> AppResult<Vec<FocusDayTotals>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT
                    substr(started_at, 1, 10) AS session_date,
                    COUNT(*) AS sessions,
                    SUM(completed) AS completed_sessions,
                    SUM(actual_minutes) AS focus_minutes
                FROM focus_sessions
                GROUP BY session_date
                ORDER BY session_date DESC
                LIMIT :days
            "#,
        )?;

        let rows = stmt
            .query_map(named_params! {":days": days as i64}, |row| {
                Ok(FocusDayTotals {
                    date: row.get("session_date")?,
                    sessions: row.get::<_, i64>("sessions")? as u32,
                    completed_sessions: row.get::<_, i64>("completed_sessions")? as u32,
                    focus_minutes: row.get("focus_minutes")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
        let deleted = conn.execute(
            "DELETE FROM focus_sessions WHERE id = :id",
            named_params! {":id": id},
        )?;

        if deleted == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }
}
