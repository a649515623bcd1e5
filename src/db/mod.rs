//! SQLite-backed workout store.

mod connection;
mod errors;
mod helpers;
mod migrations;
pub mod models;
mod repositories;

pub use connection::Database;
pub use errors::StoreError;
pub use models::{Workout, WorkoutPatch, WorkoutQuery};
