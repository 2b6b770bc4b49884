use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::snippet::{SnippetInsert, SnippetRecord, SnippetUpdate};

#[derive(Debug, Clone)]
pub struct SnippetRow {
    pub id: i64,
    pub title: String,
    pub language: String,
    pub code: String,
    pub created_at: String,
    pub updated_at: String,
}

impl SnippetRow {
    pub fn into_record(self) -> SnippetRecord {
        SnippetRecord {
            id: self.id,
            title: self.title,
            language: self.language,
            code: self.code,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl TryFrom<&Row<'_>> for SnippetRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            language: row.get("language")?,
            code: row.get("code")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct SnippetRepository;

impl SnippetRepository {
    pub fn insert(conn: &Connection, insert: &SnippetInsert) -> AppResult<SnippetRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO snippets (title, language, code, created_at, updated_at)
                VALUES (:title, :language, :code, :now, :now)
            "#,
            named_params! {
                ":title": &insert.title,
                ":language": &insert.language,
                ":code": &insert.code,
                ":now": &now,
            },
        )?;

        let id = conn.last_insert_rowid();
        Self::find_by_id(conn, id)?.ok_or_else(AppError::not_found)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<SnippetRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, title, language, code, created_at, updated_at
                FROM snippets
                WHERE id = :id
            "#,
        )?;

        let row = stmt
            .query_row(named_params! {":id": id}, |row| SnippetRow::try_from(row))
            .optional()?;

        Ok(row.map(SnippetRow::into_record))
    }

    pub fn update(conn: &Connection, id: i64, update: &SnippetUpdate) -> AppResult<SnippetRecord> {
        let existing = Self::find_by_id(conn, id)?.ok_or_else(AppError::not_found)?;
        let now = chrono::Utc::now().to_rfc3339();

        let title = update.title.as_deref().unwrap_or(&existing.title);
        let language = update.language.as_deref().unwrap_or(&existing.language);
        let code = update.code.as_deref().unwrap_or(&existing.code);

        conn.execute(
            r#"
                UPDATE snippets
                SET title = :title, language = :language, code = :code, updated_at = :now
                WHERE id = :id
            "#,
            named_params! {
                ":title": title,
                ":language": language,
                ":code": code,
                ":now": &now,
                ":id": id,
            },
        )?;

        Self::find_by_id(conn, id)?.ok_or_else(AppError::not_found)
    }

    pub fn list_all(conn: &Connection) -> AppResult<Vec<SnippetRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, title, language, code, created_at, updated_at
                FROM snippets
                ORDER BY updated_at DESC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| SnippetRow::try_from(row))?
            .map(|row| row.map(SnippetRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
        let deleted = conn.execute(
            "DELETE FROM snippets WHERE id = :id",
            named_params! {":id": id},
        )?;

        if deleted == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }
}
