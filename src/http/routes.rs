use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::{
    error::{AppError, Message},
    owner::OwnerId,
    payload::{RangeParams, StatsParams, WeekParams, WorkoutPayload},
};
use crate::{
    aggregation::{aggregate_progress, list_recent, query_range, week_view, ProgressReport, Week, WeekView},
    db::{models::SortOrder, Workout},
    log_info, AppState,
};

const ENABLE_LOGS: bool = true;

type SharedState = State<Arc<AppState>>;

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::MalformedPayload(rejection.body_text()))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| AppError::MalformedPayload(rejection.body_text()))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn list_workouts(
    State(state): SharedState,
    owner: OwnerId,
) -> Result<Json<Vec<Workout>>, AppError> {
    let workouts = list_recent(&state.db, owner.as_str(), state.config.recent_limit).await?;
    log_info!("listed workouts owner={} count={}", owner.as_str(), workouts.len());
    Ok(Json(workouts))
}

pub async fn workouts_in_range(
    State(state): SharedState,
    owner: OwnerId,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<Vec<Workout>>, AppError> {
    let range = query_params(params)?.into_range()?;
    let workouts = query_range(&state.db, owner.as_str(), range, SortOrder::Descending).await?;
    log_info!(
        "range query owner={} bounded={} count={}",
        owner.as_str(),
        range.is_some(),
        workouts.len()
    );
    Ok(Json(workouts))
}

pub async fn workout_stats(
    State(state): SharedState,
    owner: OwnerId,
    params: Result<Query<StatsParams>, QueryRejection>,
) -> Result<Json<ProgressReport>, AppError> {
    let params = query_params(params)?;
    let days = params.lookback_days(state.config.default_lookback_days)?;

    let report = aggregate_progress(
        &state.db,
        owner.as_str(),
        days,
        params.exercise_filter(),
        Utc::now(),
    )
    .await?;
    log_info!(
        "progress owner={} days={} exercises={}",
        owner.as_str(),
        days,
        report.len()
    );
    Ok(Json(report))
}

pub async fn workout_week(
    State(state): SharedState,
    owner: OwnerId,
    params: Result<Query<WeekParams>, QueryRejection>,
) -> Result<Json<WeekView>, AppError> {
    let params = query_params(params)?;
    let offset = params.offset()?;
    let anchor = params.anchor(offset, Utc::now())?;
    let week = Week::containing(anchor, offset)
        .ok_or_else(|| AppError::validation("anchor", "is outside the supported calendar"))?;

    let view = week_view(&state.db, owner.as_str(), &week).await?;
    Ok(Json(view))
}

pub async fn get_workout(
    State(state): SharedState,
    owner: OwnerId,
    Path(workout_id): Path<String>,
) -> Result<Json<Workout>, AppError> {
    let workout = state.db.get_workout(owner.as_str(), &workout_id).await?;
    Ok(Json(workout))
}

pub async fn create_workout(
    State(state): SharedState,
    owner: OwnerId,
    payload: Result<Json<WorkoutPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Workout>), AppError> {
    let draft = json_body(payload)?.into_draft()?;
    let workout = Workout::new(owner.as_str(), draft, Utc::now());

    state.db.insert_workout(&workout).await?;
    log_info!("created workout id={} owner={}", workout.id, owner.as_str());
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn update_workout(
    State(state): SharedState,
    owner: OwnerId,
    Path(workout_id): Path<String>,
    payload: Result<Json<WorkoutPayload>, JsonRejection>,
) -> Result<Json<Workout>, AppError> {
    let patch = json_body(payload)?.into_patch()?;
    let workout = state
        .db
        .update_workout(owner.as_str(), &workout_id, patch)
        .await?;
    log_info!("updated workout id={} owner={}", workout.id, owner.as_str());
    Ok(Json(workout))
}

pub async fn delete_workout(
    State(state): SharedState,
    owner: OwnerId,
    Path(workout_id): Path<String>,
) -> Result<Json<Message>, AppError> {
    state.db.delete_workout(owner.as_str(), &workout_id).await?;
    log_info!("deleted workout id={} owner={}", workout_id, owner.as_str());
    Ok(Message::new("Workout deleted"))
}
