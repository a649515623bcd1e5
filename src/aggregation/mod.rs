//! Read-side aggregation over the workout store: date-range queries,
//! per-exercise progress and the calendar week view.

pub mod progress;
pub mod range;
pub mod weekly;

pub use progress::{aggregate_progress, build_progress, ExerciseProgress, ProgressPoint, ProgressReport};
pub use range::{list_recent, query_range};
pub use weekly::{bucketize, week_view, DaySlot, Week, WeekView};
