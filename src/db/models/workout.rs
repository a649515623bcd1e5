//! Workout documents.
//!
//! A `Workout` owns its exercises and sets outright: they are stored inside the
//! workout row and only ever change together with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_WORKOUT_TYPE: &str = "General";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "kg" => Some(WeightUnit::Kg),
            "lbs" => Some(WeightUnit::Lbs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub weight: f64,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    #[serde(default)]
    pub unit: WeightUnit,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_notes: Option<String>,
}

impl Exercise {
    /// Heaviest set, or `None` when nothing was logged.
    pub fn top_weight(&self) -> Option<f64> {
        self.sets.iter().map(|set| set.weight).reduce(f64::max)
    }

    pub fn total_reps(&self) -> u32 {
        self.sets.iter().map(|set| set.reps).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub owner_id: String,
    pub date: DateTime<Utc>,
    pub workout_type: String,
    pub notes: Option<String>,
    pub exercises: Vec<Exercise>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workout {
    /// Build a fresh record for `owner_id`. A draft without a date is logged at `now`.
    pub fn new(owner_id: &str, draft: WorkoutDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            date: draft.date.unwrap_or(now),
            workout_type: draft
                .workout_type
                .unwrap_or_else(|| DEFAULT_WORKOUT_TYPE.to_string()),
            notes: draft.notes,
            exercises: draft.exercises,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated input for a new workout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutDraft {
    pub date: Option<DateTime<Utc>>,
    pub workout_type: Option<String>,
    pub notes: Option<String>,
    pub exercises: Vec<Exercise>,
}

/// Validated input for an edit. Supplied fields replace the stored ones
/// wholesale; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutPatch {
    pub date: Option<DateTime<Utc>>,
    pub workout_type: Option<String>,
    pub notes: Option<String>,
    pub exercises: Option<Vec<Exercise>>,
}

impl WorkoutPatch {
    pub fn apply(self, workout: &mut Workout, now: DateTime<Utc>) {
        if let Some(date) = self.date {
            workout.date = date;
        }
        if let Some(workout_type) = self.workout_type {
            workout.workout_type = if workout_type.is_empty() {
                DEFAULT_WORKOUT_TYPE.to_string()
            } else {
                workout_type
            };
        }
        if let Some(notes) = self.notes {
            workout.notes = (!notes.is_empty()).then_some(notes);
        }
        if let Some(exercises) = self.exercises {
            workout.exercises = exercises;
        }
        workout.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bench(sets: &[(f64, u32)]) -> Exercise {
        Exercise {
            name: "Bench Press".into(),
            unit: WeightUnit::Kg,
            sets: sets
                .iter()
                .map(|&(weight, reps)| WorkoutSet {
                    weight,
                    reps,
                    notes: None,
                })
                .collect(),
            exercise_notes: None,
        }
    }

    #[test]
    fn new_workout_fills_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let workout = Workout::new("owner-1", WorkoutDraft::default(), now);

        assert_eq!(workout.owner_id, "owner-1");
        assert_eq!(workout.date, now);
        assert_eq!(workout.workout_type, DEFAULT_WORKOUT_TYPE);
        assert!(workout.exercises.is_empty());
        assert_eq!(workout.created_at, workout.updated_at);
    }

    #[test]
    fn patch_replaces_only_supplied_fields() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let edited = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let mut workout = Workout::new(
            "owner-1",
            WorkoutDraft {
                notes: Some("felt strong".into()),
                exercises: vec![bench(&[(60.0, 8)])],
                ..WorkoutDraft::default()
            },
            created,
        );

        WorkoutPatch {
            exercises: Some(vec![bench(&[(70.0, 5), (70.0, 5)])]),
            notes: Some(String::new()),
            ..WorkoutPatch::default()
        }
        .apply(&mut workout, edited);

        assert_eq!(workout.date, created);
        assert_eq!(workout.notes, None);
        assert_eq!(workout.exercises[0].sets.len(), 2);
        assert_eq!(workout.owner_id, "owner-1");
        assert_eq!(workout.updated_at, edited);
    }

    #[test]
    fn exercise_summary_values() {
        let exercise = bench(&[(60.0, 8), (65.0, 6), (60.0, 8)]);
        assert_eq!(exercise.top_weight(), Some(65.0));
        assert_eq!(exercise.total_reps(), 22);
        assert_eq!(bench(&[]).top_weight(), None);
    }

    #[test]
    fn unit_parses_and_serializes_lowercase() {
        for (text, unit) in [("kg", WeightUnit::Kg), ("lbs", WeightUnit::Lbs)] {
            assert_eq!(WeightUnit::parse(text), Some(unit));
            assert_eq!(serde_json::to_string(&unit).unwrap(), format!("\"{text}\""));
        }
        assert_eq!(WeightUnit::parse("stone"), None);
    }
}
