use actix_web::HttpResponse;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(_)
            | DomainError::UnsupportedCurrency(_)
            | DomainError::InvalidCandle(_)
            | DomainError::PriceMismatch { .. }
            | DomainError::PromotionNotFound
            | DomainError::InvalidSignature => AppError::BadRequest(e.to_string()),
            DomainError::PromotionUnavailable => AppError::Conflict(e.to_string()),
            DomainError::NotFound => AppError::NotFound(e.to_string()),
            DomainError::PaymentProvider(_)
            | DomainError::Persistence(_)
            | DomainError::Notification(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::BadRequest(format!("Invalid request: {e}"))
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::NotFound(_) => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Conflict(_) => HttpResponse::Conflict().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Unavailable(_) => HttpResponse::ServiceUnavailable().finish(),
            AppError::Internal(detail) => {
                let request_id = Uuid::new_v4();
                log::error!("request_id={} {}", request_id, detail);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error, please contact support with request ID",
                    "request_id": request_id
                }))
            }
        }
    }
}
