use utoipa::OpenApi;

use crate::domain::catalog::{Candle, Collection, Promotion};
use crate::handlers::{catalog, health, orders, promotions};

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::create_order,
        orders::mark_order_paid,
        orders::stripe_webhook,
        catalog::list_candles,
        catalog::list_collections,
        catalog::collection_candles,
        promotions::check_promotion,
        health::health,
    ),
    components(schemas(
        orders::CreateOrderRequest,
        orders::AddressRequest,
        orders::CandleLineRequest,
        orders::CreateOrderResponse,
        orders::MessageResponse,
        promotions::CheckPromotionRequest,
        health::HealthResponse,
        Candle,
        Collection,
        Promotion,
    )),
    tags(
        (name = "orders", description = "Order placement and payment confirmation"),
        (name = "catalog", description = "Candles and collections"),
        (name = "promotions", description = "Promotion codes"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_order_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/orders"));
        assert!(doc.paths.paths.contains_key("/orders/{order_id}"));
        assert!(doc.paths.paths.contains_key("/orders/webhook"));
    }
}
