use thiserror::Error;

/// Store outcomes callers are expected to branch on. Anything else is an
/// opaque `anyhow::Error`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("workout {0} not found")]
    WorkoutNotFound(String),
}
