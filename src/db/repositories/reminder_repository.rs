use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::reminder::{ReminderInsert, ReminderRecord, ReminderUpdate};

#[derive(Debug, Clone)]
pub struct ReminderRow {
    pub id: i64,
    pub text: String,
    pub due_at: Option<String>,
    pub completed: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl ReminderRow {
    pub fn into_record(self) -> ReminderRecord {
        ReminderRecord {
            id: self.id,
            text: self.text,
            due_at: self.due_at,
            completed: self.completed != 0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl TryFrom<&Row<'_>> for ReminderRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            text: row.get("text")?,
            due_at: row.get("due_at")?,
            completed: row.get("completed")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct ReminderRepository;

impl ReminderRepository {
    pub fn insert(conn: &Connection, insert: &ReminderInsert) -> AppResult<ReminderRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO reminders (text, due_at, completed, created_at, updated_at)
                VALUES (:text, :due_at, 0, :now, :now)
            "#,
            named_params! {
                ":text": &insert.text,
                ":due_at": &insert.due_at,
                ":now": &now,
            },
        )?;

        let id = conn.last_insert_rowid();
        Self::find_by_id(conn, id)?.ok_or_else(AppError::not_found)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<ReminderRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, text, due_at, completed, created_at, updated_at
                FROM reminders
                WHERE id = :id
            "#,
        )?;

        let row = stmt
            .query_row(named_params! {":id": id}, |row| ReminderRow::try_from(row))
            .optional()?;

        Ok(row.map(ReminderRow::into_record))
    }

    pub fn update(conn: &Connection, id: i64, update: &ReminderUpdate) -> AppResult<ReminderRecord> {
        let existing = Self::find_by_id(conn, id)?.ok_or_else(AppError::not_found)?;
        let now = chrono::Utc::now().to_rfc3339();

        let text = update.text.as_deref().unwrap_or(&existing.text);
        let due_at = match &update.due_at {
            Some(value) => Some(value.as_str()),
            None => existing.due_at.as_deref(),
        };
        let completed = update.completed.unwrap_or(existing.completed);

        conn.execute(
            r#"
                UPDATE reminders
                SET text = :text, due_at = :due_at, completed = :completed, updated_at = :now
                WHERE id = :id
            "#,
            named_params! {
                ":text": text,
                ":due_at": due_at,
                ":completed": completed as i64,
                ":now": &now,
                ":id": id,
            },
        )?;

        Self::find_by_id(conn, id)?.ok_or_else(AppError::not_found)
    }

    pub fn list_pending(conn: &Connection) -> AppResult<Vec<ReminderRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, text, due_at, completed, created_at, updated_at
                FROM reminders
                WHERE completed = 0
                ORDER BY due_at IS NULL, due_at
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| ReminderRow::try_from(row))?
            .map(|row| row.map(ReminderRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn list_all(conn: &Connection) -> AppResult<Vec<ReminderRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, text, due_at, completed, created_at, updated_at
                FROM reminders
                ORDER BY completed, due_at IS NULL, due_at
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| ReminderRow::try_from(row))?
            .map(|row| row.map(ReminderRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
        let deleted = conn.execute(
            "DELETE FROM reminders WHERE id = :id",
            named_params! {":id": id},
        )?;

        if deleted == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }
}
