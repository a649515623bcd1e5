use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row, ToSql};

use crate::db::{
    connection::Database,
    errors::StoreError,
    helpers::{decode_exercises, encode_exercises, format_datetime, parse_datetime, to_i64},
    models::{Workout, WorkoutPatch, WorkoutQuery},
};

const WORKOUT_COLUMNS: &str =
    "id, owner_id, date, workout_type, notes, exercises_json, created_at, updated_at";

const NAME_CONTAINS_CLAUSE: &str = "EXISTS (
        SELECT 1 FROM json_each(workouts.exercises_json) AS exercise
        WHERE name_contains(json_extract(exercise.value, '$.name'), ?)
    )";

fn row_to_workout(row: &Row) -> Result<Workout> {
    let date: String = row.get("date")?;
    let exercises_json: String = row.get("exercises_json")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Workout {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        date: parse_datetime(&date, "date")?,
        workout_type: row.get("workout_type")?,
        notes: row.get("notes")?,
        exercises: decode_exercises(&exercises_json)?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

fn select_owned(
    conn: &rusqlite::Connection,
    owner_id: &str,
    workout_id: &str,
) -> Result<Option<Workout>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?1 AND owner_id = ?2"
    ))?;

    let workout = stmt
        .query_row(params![workout_id, owner_id], |row| Ok(row_to_workout(row)))
        .optional()?
        .transpose()?;
    Ok(workout)
}

impl Database {
    pub async fn insert_workout(&self, workout: &Workout) -> Result<()> {
        let record = workout.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO workouts (id, owner_id, date, workout_type, notes, exercises_json, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.owner_id,
                    format_datetime(&record.date),
                    record.workout_type,
                    record.notes,
                    encode_exercises(&record.exercises)?,
                    format_datetime(&record.created_at),
                    format_datetime(&record.updated_at),
                ],
            )
            .context("failed to insert workout")?;
            Ok(())
        })
        .await
    }

    /// Fetch one workout. Another owner's record is reported as not found.
    pub async fn get_workout(&self, owner_id: &str, workout_id: &str) -> Result<Workout> {
        let owner_id = owner_id.to_string();
        let workout_id = workout_id.to_string();
        self.execute(move |conn| {
            select_owned(conn, &owner_id, &workout_id)?
                .ok_or_else(|| StoreError::WorkoutNotFound(workout_id).into())
        })
        .await
    }

    /// Run a filtered read over one owner's workouts.
    ///
    /// Ties on `date` fall back to insertion order (reversed for descending
    /// queries) so repeated reads return the same sequence.
    pub async fn find_workouts(&self, owner_id: &str, query: &WorkoutQuery) -> Result<Vec<Workout>> {
        let owner_id = owner_id.to_string();
        let query = query.clone();
        self.execute(move |conn| {
            let mut clauses = vec!["owner_id = ?"];
            let mut params_vec: Vec<Box<dyn ToSql>> = vec![Box::new(owner_id)];

            if let Some(range) = query.date_range {
                clauses.push("date >= ?");
                params_vec.push(Box::new(format_datetime(&range.start())));
                clauses.push("date <= ?");
                params_vec.push(Box::new(format_datetime(&range.end())));
            }
            if let Some(from) = query.date_from {
                clauses.push("date >= ?");
                params_vec.push(Box::new(format_datetime(&from)));
            }
            if let Some(needle) = query.name_contains {
                clauses.push(NAME_CONTAINS_CLAUSE);
                params_vec.push(Box::new(needle));
            }

            let direction = query.order.as_sql();
            let mut sql = format!(
                "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE {} ORDER BY date {direction}, rowid {direction}",
                clauses.join(" AND ")
            );
            if let Some(limit) = query.limit {
                sql.push_str(" LIMIT ?");
                params_vec.push(Box::new(to_i64(limit as u64)?));
            }

            let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|b| b.as_ref()).collect();

            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_refs.as_slice())?;
            let mut workouts = Vec::new();
            while let Some(row) = rows.next()? {
                workouts.push(row_to_workout(row)?);
            }

            Ok(workouts)
        })
        .await
    }

    /// Apply `patch` to an owned workout and return the stored result.
    pub async fn update_workout(
        &self,
        owner_id: &str,
        workout_id: &str,
        patch: WorkoutPatch,
    ) -> Result<Workout> {
        let owner_id = owner_id.to_string();
        let workout_id = workout_id.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            let mut workout = match select_owned(&tx, &owner_id, &workout_id)? {
                Some(workout) => workout,
                None => return Err(StoreError::WorkoutNotFound(workout_id).into()),
            };
            patch.apply(&mut workout, Utc::now());

            let rows_affected = tx
                .execute(
                    "UPDATE workouts
                     SET date = ?1,
                         workout_type = ?2,
                         notes = ?3,
                         exercises_json = ?4,
                         updated_at = ?5
                     WHERE id = ?6 AND owner_id = ?7",
                    params![
                        format_datetime(&workout.date),
                        workout.workout_type,
                        workout.notes,
                        encode_exercises(&workout.exercises)?,
                        format_datetime(&workout.updated_at),
                        workout.id,
                        workout.owner_id,
                    ],
                )
                .context("failed to update workout")?;

            if rows_affected != 1 {
                return Err(anyhow!("workout update touched {rows_affected} rows"));
            }

            tx.commit()?;
            Ok(workout)
        })
        .await
    }

    pub async fn delete_workout(&self, owner_id: &str, workout_id: &str) -> Result<()> {
        let owner_id = owner_id.to_string();
        let workout_id = workout_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "DELETE FROM workouts WHERE id = ?1 AND owner_id = ?2",
                params![workout_id, owner_id],
            )?;

            if rows_affected == 0 {
                return Err(StoreError::WorkoutNotFound(workout_id).into());
            }

            Ok(())
        })
        .await
    }
}
