use crate::error_handler::AppError;

/// Router fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
