use actix_web::{web, HttpRequest, HttpResponse};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::application::order_service::OrderIntent;
use crate::domain::order::{Address, Billing, Destination};
use crate::domain::pricing::CartLine;
use crate::errors::AppError;
use crate::AppState;

/// Webhook bodies larger than this are refused.
const MAX_WEBHOOK_BODY: usize = 64 * 1024;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddressRequest {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub street: String,
    pub line1: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CandleLineRequest {
    pub id: Uuid,
    /// Name shown to the customer; falls back to the catalog's English name.
    pub name: Option<String>,
    /// Unit price the storefront displayed, whole currency units.
    pub price: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateOrderRequest {
    /// `huf`, `eur` or `czk`.
    pub currency: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<AddressRequest>,
    pub pickup_point: Option<String>,
    #[validate(length(min = 1, message = "at least one candle is required"))]
    pub candles: Vec<CandleLineRequest>,
    pub promotion_name: Option<String>,
    #[serde(default)]
    pub billing_address_match: bool,
    pub billing_country: Option<String>,
    pub billing_city: Option<String>,
    pub billing_zip: Option<String>,
    pub billing_street: Option<String>,
    pub billing_line1: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub order_id: Uuid,
    pub checkout_url: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MarkPaidParams {
    /// Checkout session id from the success redirect.
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn bad_request(msg: &str) -> AppError {
    AppError::BadRequest(msg.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CreateOrderRequest {
    /// Shape-checks the request and turns it into an [`OrderIntent`].
    /// Catalog and pricing checks happen later in the order service.
    pub fn into_intent(self) -> Result<OrderIntent, AppError> {
        self.validate()?;

        let currency = non_blank(self.currency).ok_or_else(|| bad_request("Currency is required"))?;

        let destination = match (self.address, non_blank(self.pickup_point)) {
            (Some(_), Some(_)) => {
                return Err(bad_request(
                    "Provide either an address or a pickup point, not both",
                ))
            }
            (Some(a), None) => {
                if [&a.country, &a.city, &a.zip, &a.street]
                    .iter()
                    .any(|f| f.trim().is_empty())
                {
                    return Err(bad_request("Incomplete address information"));
                }
                Destination::HomeDelivery(Address {
                    country: a.country,
                    city: a.city,
                    zip: a.zip,
                    street: a.street,
                    line1: a.line1.unwrap_or_default(),
                })
            }
            (None, Some(point)) => Destination::PickupPoint(point),
            (None, None) => {
                return Err(bad_request(
                    "Either address or pickup point must be provided",
                ))
            }
        };

        let billing = if self.billing_address_match {
            Billing::SameAsDelivery
        } else {
            match (
                non_blank(self.billing_country),
                non_blank(self.billing_city),
                non_blank(self.billing_zip),
                non_blank(self.billing_street),
                non_blank(self.billing_line1),
            ) {
                (Some(country), Some(city), Some(zip), Some(street), Some(line1)) => {
                    Billing::Separate(Address {
                        country,
                        city,
                        zip,
                        street,
                        line1,
                    })
                }
                _ => {
                    return Err(bad_request(
                        "Billing address fields are required when billing_address_match is false",
                    ))
                }
            }
        };

        Ok(OrderIntent {
            currency,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: non_blank(self.phone),
            destination,
            billing,
            lines: self
                .candles
                .into_iter()
                .map(|c| CartLine {
                    candle_id: c.id,
                    claimed_unit_price: c.price,
                    quantity: c.quantity,
                    name: c.name,
                })
                .collect(),
            promotion_code: self.promotion_name,
        })
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Validates the cart against the catalog, records the order as
/// `pending_payment` and returns the hosted checkout URL to redirect to.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created, redirect to checkout", body = CreateOrderResponse),
        (status = 400, description = "Invalid request, unknown candle, price mismatch or bad promotion"),
        (status = 409, description = "Promotion already used by this email"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    log::info!(
        "CreateOrder request received: email={} currency={:?} candles={} promotion={:?}",
        body.email,
        body.currency,
        body.candles.len(),
        body.promotion_name
    );

    let intent = body.into_intent()?;
    let placed = state.orders.create_order(intent).await?;

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        order_id: placed.order_id,
        checkout_url: placed.checkout_url,
    }))
}

/// PUT /orders/{order_id}
///
/// Explicit payment confirmation from the storefront's success page.
/// Confirming an already paid order succeeds without side effects.
#[utoipa::path(
    put,
    path = "/orders/{order_id}",
    params(
        ("order_id" = Uuid, Path, description = "Order UUID"),
        MarkPaidParams,
    ),
    responses(
        (status = 200, description = "Order is paid", body = MessageResponse),
        (status = 400, description = "Malformed order id"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn mark_order_paid(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<MarkPaidParams>,
) -> Result<HttpResponse, AppError> {
    let order_id = Uuid::parse_str(path.trim()).map_err(|_| bad_request("Invalid order ID"))?;
    let session_id = non_blank(query.into_inner().session_id);

    state.payments.confirm(order_id, session_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Order status updated to paid".to_string(),
    }))
}

/// POST /orders/webhook
///
/// Stripe event endpoint. Answers 200 for every correctly signed event so
/// the provider stops retrying, whatever happened to the order.
#[utoipa::path(
    post,
    path = "/orders/webhook",
    request_body(content = String, description = "Raw Stripe event JSON"),
    responses(
        (status = 200, description = "Event acknowledged"),
        (status = 400, description = "Signature verification failed"),
        (status = 503, description = "Body could not be read"),
    ),
    tag = "orders"
)]
pub async fn stripe_webhook(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let body = read_capped(payload).await.map_err(|e| {
        log::warn!("Error reading webhook body: {}", e);
        e
    })?;
    let signature = req
        .headers()
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok());

    state.payments.handle_webhook(&body, signature).await?;
    Ok(HttpResponse::Ok().finish())
}

async fn read_capped(mut payload: web::Payload) -> Result<web::Bytes, AppError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::Unavailable(e.to_string()))?;
        if body.len() + chunk.len() > MAX_WEBHOOK_BODY {
            return Err(AppError::Unavailable(format!(
                "body exceeds {MAX_WEBHOOK_BODY} bytes"
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}
