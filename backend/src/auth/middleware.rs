use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::auth::token::verify_token;
use crate::error::AppError;
use crate::extractors::AuthUser;
use crate::web_server::AppState;

// --- Middleware for JWT Authentication ---

/// Takes the second space-separated part of the `Authorization` header as the
/// token, whatever the scheme in front of it.
fn presented_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(' ').nth(1))
        .filter(|token| !token.is_empty())
}

/// Rejects requests that present no token (403) or one that fails
/// verification (401). On success the caller is stored as an [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = presented_token(&request).ok_or(AppError::AccessDenied)?;
    let claims = verify_token(token, &state.app_config.jwt.secret)?;

    request.extensions_mut().insert(AuthUser {
        id: claims.id,
        role: claims.role,
    });

    Ok(next.run(request).await)
}
