//! REST surface over the workout store.
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/api/workouts` | most recent workouts |
//! | GET | `/api/workouts/range?startDate&endDate` | workouts in a closed range |
//! | GET | `/api/workouts/stats?exerciseName&days` | per-exercise progress |
//! | GET | `/api/workouts/week?anchor&utcOffsetMinutes` | Monday-first week view |
//! | GET/PUT/DELETE | `/api/workouts/{id}` | single workout |
//! | POST | `/api/workouts` | create |
//!
//! Every `/api` route needs the `X-Owner-Id` header.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use log::info;
use tokio::{net::TcpListener, signal};

pub mod error;
pub mod owner;
pub mod payload;
pub mod routes;

pub use error::AppError;
pub use owner::{OwnerId, OWNER_HEADER};

use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/api/workouts",
            get(routes::list_workouts).post(routes::create_workout),
        )
        .route("/api/workouts/range", get(routes::workouts_in_range))
        .route("/api/workouts/stats", get(routes::workout_stats))
        .route("/api/workouts/week", get(routes::workout_week))
        .route(
            "/api/workouts/{id}",
            get(routes::get_workout)
                .put(routes::update_workout)
                .delete(routes::delete_workout),
        )
        .with_state(state)
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr().context("listener has no local address")?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    info!("Server shut down");
    Ok(())
}

pub async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
