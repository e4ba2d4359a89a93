use crate::{error::AppError, web_server::AppState};
use axum::{extract::OptionalFromRequestParts, http::request::Parts};
use jlearn_common::Role;

/// The caller identified by a verified bearer token.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
}

// The auth middleware is responsible for putting AuthUser in extensions.
// Handlers mounted both with and without it take `Option<AuthUser>`.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().cloned())
    }
}
