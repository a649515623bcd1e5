use axum::{extract::FromRequestParts, http::request::Parts};

use super::error::AppError;

/// Header carrying the caller's user id, set by the authenticating proxy.
pub const OWNER_HEADER: &str = "x-owner-id";

/// The user every query in a request is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner = parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(AppError::Unauthorized)?;

        Ok(OwnerId(owner.to_string()))
    }
}
