//! Request bodies and query strings, and their conversion into validated
//! store types. Nothing in here touches the database.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use super::error::AppError;
use crate::db::models::{
    DateRange, Exercise, WeightUnit, WorkoutDraft, WorkoutPatch, WorkoutSet,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPayload {
    pub weight: Option<f64>,
    pub reps: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePayload {
    pub name: Option<String>,
    pub unit: Option<String>,
    #[serde(default)]
    pub sets: Vec<SetPayload>,
    pub exercise_notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPayload {
    pub date: Option<String>,
    pub workout_type: Option<String>,
    pub notes: Option<String>,
    pub exercises: Option<Vec<ExercisePayload>>,
}

impl WorkoutPayload {
    pub fn into_draft(self) -> Result<WorkoutDraft, AppError> {
        Ok(WorkoutDraft {
            date: parse_optional_date(self.date)?,
            workout_type: non_empty(self.workout_type),
            notes: non_empty(self.notes),
            exercises: validate_exercises(self.exercises.unwrap_or_default())?,
        })
    }

    pub fn into_patch(self) -> Result<WorkoutPatch, AppError> {
        Ok(WorkoutPatch {
            date: parse_optional_date(self.date)?,
            workout_type: self.workout_type.map(|value| value.trim().to_string()),
            notes: self.notes.map(|value| value.trim().to_string()),
            exercises: self.exercises.map(validate_exercises).transpose()?,
        })
    }
}

/// A blank `date` counts as not supplied.
fn parse_optional_date(raw: Option<String>) -> Result<Option<DateTime<Utc>>, AppError> {
    non_empty(raw)
        .map(|raw| parse_timestamp("date", &raw))
        .transpose()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_exercises(exercises: Vec<ExercisePayload>) -> Result<Vec<Exercise>, AppError> {
    exercises
        .into_iter()
        .enumerate()
        .map(|(index, exercise)| validate_exercise(index, exercise))
        .collect()
}

fn validate_exercise(index: usize, payload: ExercisePayload) -> Result<Exercise, AppError> {
    let field = format!("exercises[{index}]");

    let name = non_empty(payload.name)
        .ok_or_else(|| AppError::validation(format!("{field}.name"), "is required"))?;

    let unit = match payload.unit.as_deref().map(str::trim) {
        None | Some("") => WeightUnit::default(),
        Some(raw) => WeightUnit::parse(raw).ok_or_else(|| {
            AppError::validation(format!("{field}.unit"), "must be one of kg, lbs")
        })?,
    };

    let sets = payload
        .sets
        .into_iter()
        .enumerate()
        .map(|(set_index, set)| validate_set(&format!("{field}.sets[{set_index}]"), set))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Exercise {
        name,
        unit,
        sets,
        exercise_notes: non_empty(payload.exercise_notes),
    })
}

fn validate_set(field: &str, payload: SetPayload) -> Result<WorkoutSet, AppError> {
    let weight = payload
        .weight
        .ok_or_else(|| AppError::validation(format!("{field}.weight"), "is required"))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(AppError::validation(
            format!("{field}.weight"),
            "must be a number of at least 0",
        ));
    }

    let reps = match payload.reps {
        None => 1,
        Some(reps) => u32::try_from(reps)
            .ok()
            .filter(|reps| *reps >= 1)
            .ok_or_else(|| {
                AppError::validation(format!("{field}.reps"), "must be a whole number of at least 1")
            })?,
    };

    Ok(WorkoutSet {
        weight,
        reps,
        notes: non_empty(payload.notes),
    })
}

/// Accepts RFC 3339 timestamps, or a bare `YYYY-MM-DD` read as UTC midnight.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| AppError::validation(field, format!("'{raw}' is not a valid date")))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeParams {
    /// `None` unless both ends are given.
    pub fn into_range(self) -> Result<Option<DateRange>, AppError> {
        let (Some(start), Some(end)) = (self.start_date, self.end_date) else {
            return Ok(None);
        };

        let start = parse_timestamp("startDate", &start)?;
        let end = parse_timestamp("endDate", &end)?;
        DateRange::new(start, end)
            .map(Some)
            .ok_or_else(|| AppError::validation("startDate", "must not be after endDate"))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsParams {
    pub exercise_name: Option<String>,
    pub days: Option<String>,
}

impl StatsParams {
    pub fn lookback_days(&self, default_days: u32) -> Result<u32, AppError> {
        match self.days.as_deref().map(str::trim) {
            None | Some("") => Ok(default_days),
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::validation("days", "must be a whole number of at least 0")),
        }
    }

    pub fn exercise_filter(&self) -> Option<&str> {
        self.exercise_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekParams {
    pub anchor: Option<String>,
    pub utc_offset_minutes: Option<String>,
}

impl WeekParams {
    pub fn offset(&self) -> Result<FixedOffset, AppError> {
        let minutes = match self.utc_offset_minutes.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw.parse::<i32>().map_err(|_| {
                AppError::validation("utcOffsetMinutes", "must be a whole number of minutes")
            })?,
        };

        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| AppError::validation("utcOffsetMinutes", "must be within ±24 hours"))
    }

    /// The requested anchor day, or today in `offset`.
    pub fn anchor(&self, offset: FixedOffset, now: DateTime<Utc>) -> Result<NaiveDate, AppError> {
        match self.anchor.as_deref().map(str::trim) {
            None | Some("") => Ok(now.with_timezone(&offset).date_naive()),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::validation("anchor", format!("'{raw}' is not a YYYY-MM-DD date"))
            }),
        }
    }
}
