//! HTTP handlers

pub mod health;
pub mod downloads;
pub mod statistics;


use crate::AppError;

/// Method fallback for routes that only accept one method
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
