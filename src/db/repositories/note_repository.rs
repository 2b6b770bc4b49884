use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::note::{NoteInsert, NoteRecord, NoteUpdate};

#[derive(Debug, Clone)]
pub struct NoteRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub pinned: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl NoteRow {
    pub fn into_record(self) -> NoteRecord {
        NoteRecord {
            id: self.id,
            title: self.title,
            content: self.content,
            pinned: self.pinned != 0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl TryFrom<&Row<'_>> for NoteRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            content: row.get("content")?,
            pinned: row.get("pinned")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct NoteRepository;

impl NoteRepository {
    pub fn insert(conn: &Connection, insert: &NoteInsert) -> AppResult<NoteRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO notes (title, content, pinned, created_at, updated_at)
                VALUES (:title, :content, :pinned, :now, :now)
            "#,
            named_params! {
                ":title": &insert.title,
                ":content": &insert.content,
                ":pinned": insert.pinned as i64,
                ":now": &now,
            },
        )?;

        let id = conn.last_insert_rowid();
        Self::find_by_id(conn, id)?.ok_or_else(AppError::not_found)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<NoteRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, content, pinned, created_at, updated_at FROM notes WHERE id = :id",
        )?;

        let row = stmt
            .query_row(named_params! {":id": id}, |row| NoteRow::try_from(row))
            .optional()?;

        Ok(row.map(NoteRow::into_record))
    }

    pub fn update(conn: &Connection, id: i64, update: &NoteUpdate) -> AppResult<NoteRecord> {
        let existing = Self::find_by_id(conn, id)?.ok_or_else(AppError::not_found)?;
        let now = chrono::Utc::now().to_rfc3339();

        let title = update.title.as_deref().unwrap_or(&existing.title);
        let content = update.content.as_deref().unwrap_or(&existing.content);
        let pinned = update.pinned.unwrap_or(existing.pinned);

        conn.execute(
            r#"
                UPDATE notes
                SET title = :title, content = :content, pinned = :pinned, updated_at = :now
                WHERE id = :id
            "#,
            named_params! {
                ":title": title,
                ":content": content,
                ":pinned": pinned as i64,
                ":now": &now,
                ":id": id,
            },
        )?;

        Self::find_by_id(conn, id)?.ok_or_else(AppError::not_found)
    }

    pub fn list_all(conn: &Connection) -> AppResult<Vec<NoteRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, title, content, pinned, created_at, updated_at
                FROM notes
                ORDER BY pinned DESC, updated_at DESC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| NoteRow::try_from(row))?
            .map(|row| row.map(NoteRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
        let deleted = conn.execute("DELETE FROM notes WHERE id = :id", named_params! {":id": id})?;

        if deleted == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }
}
