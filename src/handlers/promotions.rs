use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::catalog::Promotion;
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckPromotionRequest {
    pub email: String,
    pub promotion_name: String,
}

/// POST /promotions
///
/// Looks up a promotion code for a customer. Unlike order creation, an
/// unknown code is reported as 404 here.
#[utoipa::path(
    post,
    path = "/promotions",
    request_body = CheckPromotionRequest,
    responses(
        (status = 200, description = "Promotion is available", body = Promotion),
        (status = 404, description = "Promotion not found"),
        (status = 409, description = "Promotion already used by this email"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "promotions"
)]
pub async fn check_promotion(
    state: web::Data<AppState>,
    body: web::Json<CheckPromotionRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let promotion = state
        .promotions
        .require_available(&body.promotion_name, &body.email)
        .await
        .map_err(|e| match e {
            DomainError::PromotionNotFound => AppError::NotFound("Promotion not found".into()),
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(promotion))
}
