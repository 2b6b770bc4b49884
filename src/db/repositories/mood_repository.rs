use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::mood::{MoodSampleInsert, MoodSampleRecord};

#[derive(Debug, Clone)]
pub struct MoodSampleRow {
    pub id: i64,
    pub recorded_at: String,
    pub score: i64,
    pub note: Option<String>,
}

impl MoodSampleRow {
    pub fn into_record(self) -> MoodSampleRecord {
        MoodSampleRecord {
            id: self.id,
            recorded_at: self.recorded_at,
            score: self.score,
            note: self.note,
        }
    }
}

impl TryFrom<&Row<'_>> for MoodSampleRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            recorded_at: row.get("recorded_at")?,
            score: row.get("score")?,
            note: row.get("note")?,
        })
    }
}

pub struct MoodRepository;

impl MoodRepository {
    pub fn insert(conn: &Connection, insert: &MoodSampleInsert) -> AppResult<MoodSampleRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO mood_samples (recorded_at, score, note)
                VALUES (:recorded_at, :score, :note)
            "#,
            named_params! {
                ":recorded_at": &now,
                ":score": insert.score,
                ":note": &insert.note,
            },
        )?;

        let id = conn.last_insert_rowid();
        Self::find_by_id(conn, id)?.ok_or_else(AppError::not_found)
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> AppResult<Option<MoodSampleRecord>> {
        let mut stmt = conn
            .prepare("SELECT id, recorded_at, score, note FROM mood_samples WHERE id = :id")?;

        let row = stmt
            .query_row(named_params! {":id": id}, |row| {
                MoodSampleRow::try_from(row)
            })
            .optional()?;

        Ok(row.map(MoodSampleRow::into_record))
    }

    pub fn list_recent(conn: &Connection, limit: usize) -> AppResult<Vec<MoodSampleRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, recorded_at, score, note
                FROM mood_samples
                ORDER BY recorded_at DESC
                LIMIT :limit
            "#,
        )?;

        let rows = stmt
            .query_map(named_params! {":limit": limit as i64}, |row| {
                MoodSampleRow::try_from(row)
            })?
            .map(|row| row.map(MoodSampleRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn delete(conn: &Connection, id: i64) -> AppResult<()> {
        let deleted = conn.execute(
            "DELETE FROM mood_samples WHERE id = :id",
            named_params! {":id": id},
        )?;

        if deleted == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }
}
