pub mod query;
pub mod workout;

pub use query::{name_matches, DateRange, SortOrder, WorkoutQuery};
pub use workout::{
    Exercise, WeightUnit, Workout, WorkoutDraft, WorkoutPatch, WorkoutSet, DEFAULT_WORKOUT_TYPE,
};
