use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
    #[error("Invalid candle ID: {0}")]
    InvalidCandle(Uuid),
    #[error("Candle price mismatch for candle ID: {candle_id}")]
    PriceMismatch {
        candle_id: Uuid,
        expected: i64,
        claimed: i64,
    },
    #[error("Invalid promotion code")]
    PromotionNotFound,
    #[error("Promotion already used by this email")]
    PromotionUnavailable,
    #[error("Order not found")]
    NotFound,
    #[error("Invalid webhook signature")]
    InvalidSignature,
    #[error("Payment provider error: {0}")]
    PaymentProvider(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Notification error: {0}")]
    Notification(String),
}
