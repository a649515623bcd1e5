//! Per-exercise progress over a trailing window.
//!
//! Observations are bucketed by lowercased exercise name. Buckets keep the
//! order in which their exercise was first seen, and each bucket keeps the
//! order of the workouts it was built from, so the report serializes the
//! same way every time the same rows are read.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::db::{
    models::{Exercise, SortOrder, WeightUnit, WorkoutSet},
    Database, Workout, WorkoutQuery,
};

/// One logged exercise on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPoint {
    pub workout_id: String,
    pub date: DateTime<Utc>,
    pub unit: WeightUnit,
    /// Heaviest set of the day.
    pub weight: Option<f64>,
    pub sets: Vec<WorkoutSet>,
    /// Reps summed across all sets.
    pub reps: u32,
}

impl ProgressPoint {
    fn observe(workout: &Workout, exercise: &Exercise) -> Self {
        Self {
            workout_id: workout.id.clone(),
            date: workout.date,
            unit: exercise.unit,
            weight: exercise.top_weight(),
            sets: exercise.sets.clone(),
            reps: exercise.total_reps(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseProgress {
    pub name: String,
    pub points: Vec<ProgressPoint>,
}

/// Serializes as a JSON object keyed by exercise name, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressReport {
    buckets: Vec<ExerciseProgress>,
}

impl ProgressReport {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn get(&self, name: &str) -> Option<&[ProgressPoint]> {
        self.buckets
            .iter()
            .find(|bucket| bucket.name == name)
            .map(|bucket| bucket.points.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|bucket| bucket.name.as_str())
    }
}

impl Serialize for ProgressReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.name, &bucket.points)?;
        }
        map.end()
    }
}

pub fn bucket_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Group every exercise in `workouts` by name. `workouts` must already be in
/// the order the observations should appear.
pub fn build_progress<'a, I>(workouts: I) -> ProgressReport
where
    I: IntoIterator<Item = &'a Workout>,
{
    let mut report = ProgressReport::default();
    let mut index: HashMap<String, usize> = HashMap::new();

    for workout in workouts {
        for exercise in &workout.exercises {
            let key = bucket_key(&exercise.name);
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                report.buckets.push(ExerciseProgress {
                    name: key,
                    points: Vec::new(),
                });
                report.buckets.len() - 1
            });
            report.buckets[slot]
                .points
                .push(ProgressPoint::observe(workout, exercise));
        }
    }

    report
}

/// Progress for `owner_id` over the `lookback_days` leading up to `now`.
///
/// `exercise_filter` selects workouts that logged a matching exercise; every
/// exercise of a selected workout is reported. Workouts dated after `now` are
/// still included; the window has no upper bound.
pub async fn aggregate_progress(
    db: &Database,
    owner_id: &str,
    lookback_days: u32,
    exercise_filter: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ProgressReport> {
    let window_start = now
        .checked_sub_signed(Duration::days(i64::from(lookback_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let needle = exercise_filter
        .map(str::trim)
        .filter(|needle| !needle.is_empty());

    let mut query = WorkoutQuery::new(SortOrder::Ascending).since(window_start);
    if let Some(needle) = needle {
        query = query.name_contains(needle);
    }

    let workouts = db
        .find_workouts(owner_id, &query)
        .await
        .with_context(|| format!("progress query for owner {owner_id} failed"))?;

    Ok(build_progress(&workouts))
}
