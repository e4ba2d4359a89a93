use bcrypt::{hash, verify};

use crate::error::AppError;

/// Salted bcrypt hash of `plain`. Runs on the blocking pool.
pub async fn hash_password(plain: &str, cost: u32) -> Result<String, AppError> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || hash(plain, cost))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Hashing task failed: {e}")))?
        .map_err(AppError::from)
}

/// True only when `plain` is the password that produced `hashed`.
pub async fn verify_password(plain: &str, hashed: &str) -> Result<bool, AppError> {
    let plain = plain.to_owned();
    let hashed = hashed.to_owned();
    tokio::task::spawn_blocking(move || verify(plain, &hashed))
        .await
        .map_err(|e| AppError::InternalServerError(format!("Verification task failed: {e}")))?
        .map_err(AppError::from)
}
