//! Backend for a personal workout log: workouts with exercises and sets,
//! a recent-workouts dashboard, per-exercise progress and a weekly calendar.

pub mod aggregation;
pub mod config;
pub mod db;
pub mod http;
pub mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use tokio::net::TcpListener;

use config::AppConfig;
use db::Database;

pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Arc<Self> {
        Arc::new(Self { db, config })
    }
}

pub async fn run() -> Result<()> {
    utils::init_logging(log::LevelFilter::Info);
    info!("ironlog starting up...");

    let config = AppConfig::load().context("failed to load configuration")?;
    let database = Database::new(config.database_path.clone())?;

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    http::serve(listener, AppState::new(database, config), http::shutdown_signal()).await
}
