pub mod catalog;
pub mod health;
pub mod orders;
pub mod promotions;

use actix_web::web;

/// Registers every route on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health))
        .route("/candles", web::get().to(catalog::list_candles))
        .route("/collections", web::get().to(catalog::list_collections))
        .route(
            "/collections/{name}/candles",
            web::get().to(catalog::collection_candles),
        )
        .route("/promotions", web::post().to(promotions::check_promotion))
        .service(
            web::scope("/orders")
                .route("", web::post().to(orders::create_order))
                .route("/webhook", web::post().to(orders::stripe_webhook))
                .route("/{order_id}", web::put().to(orders::mark_order_paid)),
        );
}
