use std::convert::TryFrom;

use chrono::NaiveDate;
use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::output::{OutputEntryRecord, OutputTypeInsert, OutputTypeRecord};

#[derive(Debug, Clone)]
pub struct OutputTypeRow {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub daily_target: i64,
    pub created_at: String,
}

impl OutputTypeRow {
    pub fn into_record(self) -> OutputTypeRecord {
        OutputTypeRecord {
            id: self.id,
            name: self.name,
            unit: self.unit,
            daily_target: self.daily_target,
            created_at: self.created_at,
        }
    }
}

impl TryFrom<&Row<'_>> for OutputTypeRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            unit: row.get("unit")?,
            daily_target: row.get("daily_target")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct OutputEntryRow {
    pub id: i64,
    pub type_id: i64,
    pub entry_date: String,
    pub count: i64,
    pub completed: i64,
    pub updated_at: String,
}

impl OutputEntryRow {
    pub fn into_record(self) -> OutputEntryRecord {
        OutputEntryRecord {
            id: self.id,
            type_id: self.type_id,
            entry_date: self.entry_date,
            count: self.count,
            completed: self.completed != 0,
            updated_at: self.updated_at,
        }
    }
}

impl TryFrom<&Row<'_>> for OutputEntryRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            type_id: row.get("type_id")?,
            entry_date: row.get("entry_date")?,
            count: row.get("count")?,
            completed: row.get("completed")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct OutputRepository;

impl OutputRepository {
    pub fn insert_type(conn: &Connection, insert: &OutputTypeInsert) -> AppResult<OutputTypeRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO output_types (name, unit, daily_target, created_at)
                VALUES (:name, :unit, :daily_target, :created_at)
            "#,
            named_params! {
                ":name": &insert.name,
                ":unit": &insert.unit,
                ":daily_target": insert.daily_target,
                ":created_at": &now,
            },
        )?;

        let id = conn.last_insert_rowid();
        Self::find_type_by_id(conn, id)?.ok_or_else(AppError::not_found)
    }

    pub fn find_type_by_id(conn: &Connection, id: i64) -> AppResult<Option<OutputTypeRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, unit, daily_target, created_at FROM output_types WHERE id = :id",
        )?;

        let row = stmt
            .query_row(named_params! {":id": id}, |row| OutputTypeRow::try_from(row))
            .optional()?;

        Ok(row.map(OutputTypeRow::into_record))
    }

    pub fn find_type_by_name(conn: &Connection, name: &str) -> AppResult<Option<OutputTypeRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, unit, daily_target, created_at FROM output_types WHERE name = :name",
        )?;

        let row = stmt
            .query_row(named_params! {":name": name}, |row| {
                OutputTypeRow::try_from(row)
            })
            .optional()?;

        Ok(row.map(OutputTypeRow::into_record))
    }

    pub fn list_types(conn: &Connection) -> AppResult<Vec<OutputTypeRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, unit, daily_target, created_at FROM output_types ORDER BY name",
        )?;

        let rows = stmt
            .query_map([], |row| OutputTypeRow::try_from(row))?
            .map(|row| row.map(OutputTypeRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn delete_type(conn: &Connection, id: i64) -> AppResult<()> {
        let deleted = conn.execute(
            "DELETE FROM output_types WHERE id = :id",
            named_params! {":id": id},
        )?;

        if deleted == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }

    /// Upsert one day's count. `completed` is stamped by the caller from the
    /// type's daily target at write time; the streak engine never recomputes it.
    pub fn upsert_entry(
        conn: &Connection,
        type_id: i64,
        entry_date: &NaiveDate,
        count: i64,
        completed: bool,
    ) -> AppResult<OutputEntryRecord> {
        let now = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO output_entries (type_id, entry_date, count, completed, updated_at)
                VALUES (:type_id, :entry_date, :count, :completed, :updated_at)
                ON CONFLICT(type_id, entry_date) DO UPDATE SET
                    count = excluded.count,
                    completed = excluded.completed,
                    updated_at = excluded.updated_at
            "#,
            named_params! {
                ":type_id": type_id,
                ":entry_date": entry_date.to_string(),
                ":count": count,
                ":completed": completed as i64,
                ":updated_at": &now,
            },
        )?;

        Self::find_entry(conn, type_id, entry_date)?.ok_or_else(AppError::not_found)
    }

    pub fn find_entry(
        conn: &Connection,
        type_id: i64,
        entry_date: &NaiveDate,
    ) -> AppResult<Option<OutputEntryRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, type_id, entry_date, count, completed, updated_at
                FROM output_entries
                WHERE type_id = :type_id AND entry_date = :entry_date
            "#,
        )?;

        let row = stmt
            .query_row(
                named_params! {":type_id": type_id, ":entry_date": entry_date.to_string()},
                |row| OutputEntryRow::try_from(row),
            )
            .optional()?;

        Ok(row.map(OutputEntryRow::into_record))
    }

    pub fn list_recent_entries(
        conn: &Connection,
        type_id: i64,
        limit: usize,
    ) -> AppResult<Vec<OutputEntryRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, type_id, entry_date, count, completed, updated_at
                FROM output_entries
                WHERE type_id = :type_id
                ORDER BY entry_date DESC
                LIMIT :limit
            "#,
        )?;

        let rows = stmt
            .query_map(
                named_params! {":type_id": type_id, ":limit": limit as i64},
                |row| OutputEntryRow::try_from(row),
            )?
            .map(|row| row.map(OutputEntryRow::into_record).map_err(AppError::from))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    pub fn status_pairs(conn: &Connection, type_id: i64) -> AppResult<Vec<(String, bool)>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT entry_date, completed
                FROM output_entries
                WHERE type_id = :type_id
                ORDER BY entry_date DESC
            "#,
        )?;

        let rows = stmt
            .query_map(named_params! {":type_id": type_id}, |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? != 0))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
