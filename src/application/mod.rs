pub mod order_service;
pub mod payment_service;
pub mod promotion_gate;

use actix_web::web;

use crate::domain::errors::DomainError;

/// Runs a blocking store call on the blocking thread pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, DomainError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| DomainError::Persistence(e.to_string()))?
}
