use anyhow::{Context, Result};

use crate::db::{
    models::{DateRange, SortOrder},
    Database, Workout, WorkoutQuery,
};

/// Workouts of `owner_id` dated inside `range`, both ends included, in
/// `order`. Without a range every workout of the owner comes back, newest
/// first.
pub async fn query_range(
    db: &Database,
    owner_id: &str,
    range: Option<DateRange>,
    order: SortOrder,
) -> Result<Vec<Workout>> {
    let query = match range {
        Some(range) => WorkoutQuery::new(order).within(range),
        None => WorkoutQuery::new(SortOrder::Descending),
    };

    db.find_workouts(owner_id, &query)
        .await
        .with_context(|| format!("range query for owner {owner_id} failed"))
}

/// The dashboard listing: the `limit` most recent workouts.
pub async fn list_recent(db: &Database, owner_id: &str, limit: usize) -> Result<Vec<Workout>> {
    db.find_workouts(owner_id, &WorkoutQuery::new(SortOrder::Descending).limit(limit))
        .await
        .with_context(|| format!("listing workouts for owner {owner_id} failed"))
}
