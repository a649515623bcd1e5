use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{functions::FunctionFlags, Connection};

use crate::db::models::{name_matches, Exercise};

/// SQL name of the Unicode-aware substring test, `name_contains(name, needle)`.
pub const NAME_CONTAINS_FN: &str = "name_contains";

/// Register the scalar functions the repositories rely on. SQLite's own
/// `lower()` only folds ASCII, so name matching goes through Rust.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        NAME_CONTAINS_FN,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let name: Option<String> = ctx.get(0)?;
            let needle: String = ctx.get(1)?;
            Ok(name.is_some_and(|name| name_matches(&needle, &name)))
        },
    )
}

pub fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

/// Fixed-width UTC text, so string comparison in SQL orders chronologically.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn encode_exercises(exercises: &[Exercise]) -> Result<String> {
    serde_json::to_string(exercises).context("failed to serialize exercises")
}

pub fn decode_exercises(value: &str) -> Result<Vec<Exercise>> {
    serde_json::from_str(value).context("failed to parse exercises_json")
}
