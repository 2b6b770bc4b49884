use std::convert::TryFrom;

use chrono::NaiveDate;
use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::journal::{JournalEntryRecord, JournalEntryUpsert};

#[derive(Debug, Clone)]
pub struct JournalEntryRow {
    pub id: i64,
    pub entry_date: String,
    pub content: String,
    pub mood: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl JournalEntryRow {
    pub fn into_record(self) -> JournalEntryRecord {
        JournalEntryRecord {
            id: self.id,
            entry_date: self.entry_date,
            content: self.content,
            mood: self.mood,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl TryFrom<&Row<'_>> for JournalEntryRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            entry_date: row.get("entry_date")?,
            content: row.get("content")?,
            mood: row.get("mood")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct JournalRepository;

impl JournalRepository {
    pub fn upsert(
        conn: &Connection,
        entry_date: &NaiveDate,
        input: &JournalEntryUpsert,
    ) -> AppResult<JournalEntryRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO journal_entries (entry_date, content, mood, created_at, updated_at)
                VALUES (:entry_date, :content, :mood, :now, :now)
                ON CONFLICT(entry_date) DO UPDATE SET
                    content = excluded.content,
                    mood = excluded.mood,
                    updated_at = excluded.updated_at
            "#,
            named_params! {
                ":entry_date": entry_date.to_string(),
                ":content": &input.content,
                ":mood": &input.mood,
                ":now": &now,
            },
        )?;

        Self::find_by_date(conn, entry_date)?.ok_or_else(AppError::not_found)
    }

    pub fn find_by_date(
        conn: &Connection,
        entry_date: &NaiveDate,
    ) -> AppResult<Option<JournalEntryRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, entry_date, content, mood, created_at, updated_at
                FROM journal_entries
                WHERE entry_date = :entry_date
            "#,
        )?;

        let row = stmt
            .query_row(
                named_params! {":entry_date": entry_date.to_string()},
                |row| JournalEntryRow::try_from(row),
            )
            .optional()?;

        Ok(row.map(JournalEntryRow::into_record))
    }

    pub fn list_recent(conn: &Connection, limit: usize) -> AppResult<Vec<JournalEntryRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, entry_date, content, mood, created_at, updated_at
                FROM journal_entries
                ORDER BY entry_date DESC
                LIMIT :limit
            "#,
        )?;

        let rows = stmt
            .query_map(named_params! {":limit": limit as i64}, |row| {
                JournalEntryRow::try_from(row)
            })?
            .map(|row| row.map(JournalEntryRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn delete(conn: &Connection, entry_date: &NaiveDate) -> AppResult<()> {
        let deleted = conn.execute(
            "DELETE FROM journal_entries WHERE entry_date = :entry_date",
            named_params! {":entry_date": entry_date.to_string()},
        )?;

        if deleted == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }
}
