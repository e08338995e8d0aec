use std::sync::Arc;

use candle_shop::application::order_service::OrderService;
use candle_shop::application::payment_service::PaymentService;
use candle_shop::application::promotion_gate::PromotionGate;
use candle_shop::config::AppConfig;
use candle_shop::domain::ports::Notifier;
use candle_shop::infrastructure::catalog_repo::DieselCatalogStore;
use candle_shop::infrastructure::mailer::{HttpMailer, LogNotifier};
use candle_shop::infrastructure::order_repo::DieselOrderLedger;
use candle_shop::infrastructure::promotion_repo::DieselPromotionStore;
use candle_shop::infrastructure::stripe::{StripeCheckoutGateway, StripeWebhookVerifier};
use candle_shop::{build_server, create_pool, run_migrations, AppState};
use dotenvy::dotenv;

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{context}: {e}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    let pool = create_pool(&config.database_url)
        .map_err(|e| startup_error("Failed to create DB pool", e))?;
    run_migrations(&pool).map_err(|e| startup_error("Failed to run database migrations", e))?;

    let ledger = Arc::new(DieselOrderLedger::new(pool.clone()));
    let catalog = Arc::new(DieselCatalogStore::new(pool.clone()));
    let promotions = PromotionGate::new(Arc::new(DieselPromotionStore::new(pool)));
    let checkout = StripeCheckoutGateway::new(config.stripe.clone())
        .map_err(|e| startup_error("Failed to build Stripe client", e))?;

    let notifier: Arc<dyn Notifier> = match config.mail.clone() {
        Some(mail) => {
            Arc::new(HttpMailer::new(mail).map_err(|e| startup_error("Failed to build mailer", e))?)
        }
        None => {
            log::warn!("MAIL_API_URL not set, order emails will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let state = AppState {
        orders: OrderService::new(
            ledger.clone(),
            catalog.clone(),
            promotions.clone(),
            Arc::new(checkout),
        ),
        payments: PaymentService::new(
            ledger,
            promotions.clone(),
            notifier,
            Arc::new(StripeWebhookVerifier::new(
                config.webhook_secret.clone(),
                config.webhook_tolerance_secs,
            )),
        ),
        promotions,
        catalog,
    };

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
