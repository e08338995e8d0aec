use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use super::blocking;
use super::promotion_gate::PromotionGate;
use crate::domain::catalog::Candle;
use crate::domain::checkout::{build_line_items, ChargeableLine, CheckoutRequest};
use crate::domain::errors::DomainError;
use crate::domain::order::{Billing, Destination, NewOrderItem, OrderDraft, OrderHeader};
use crate::domain::ports::{CatalogStore, CheckoutGateway, OrderLedger};
use crate::domain::pricing::{price_cart, CartLine, Currency, PricedCart};

/// A customer's request to buy, already shape-checked.
#[derive(Debug, Clone)]
pub struct OrderIntent {
    pub currency: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub destination: Destination,
    pub billing: Billing,
    pub lines: Vec<CartLine>,
    pub promotion_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order_id: Uuid,
    pub checkout_url: String,
    pub pricing: PricedCart,
}

#[derive(Clone)]
pub struct OrderService {
    ledger: Arc<dyn OrderLedger>,
    catalog: Arc<dyn CatalogStore>,
    promotions: PromotionGate,
    checkout: Arc<dyn CheckoutGateway>,
}

impl OrderService {
    pub fn new(
        ledger: Arc<dyn OrderLedger>,
        catalog: Arc<dyn CatalogStore>,
        promotions: PromotionGate,
        checkout: Arc<dyn CheckoutGateway>,
    ) -> Self {
        Self {
            ledger,
            catalog,
            promotions,
            checkout,
        }
    }

    /// Validates and prices the cart, places the order and opens a checkout
    /// session for it.
    ///
    /// Nothing is written until every line has been checked against the
    /// catalog. Once the order is placed it stays `pending_payment` even if
    /// the checkout session cannot be opened.
    pub async fn create_order(&self, intent: OrderIntent) -> Result<PlacedOrder, DomainError> {
        validate_lines(&intent.lines)?;
        let currency: Currency = intent.currency.parse()?;

        let promotion = match intent.promotion_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                let promotion = self.promotions.require_available(code, &intent.email).await?;
                log::info!(
                    "Promotion applied: {} with {}% discount",
                    promotion.name,
                    promotion.percentage
                );
                Some(promotion)
            }
            _ => None,
        };

        let candles = self.load_candles(&intent.lines).await?;
        let mode = intent.destination.mode();
        let pricing = price_cart(
            currency,
            &intent.lines,
            |id| candles.get(&id),
            promotion.as_ref().map(|p| p.percentage),
            mode,
        )?;

        let chargeable: Vec<ChargeableLine> = intent
            .lines
            .iter()
            .map(|l| ChargeableLine {
                name: display_name(l, &candles[&l.candle_id]),
                unit_price: l.claimed_unit_price,
                quantity: l.quantity,
            })
            .collect();

        let draft = OrderDraft {
            header: OrderHeader {
                email: intent.email.clone(),
                first_name: intent.first_name,
                last_name: intent.last_name,
                phone: intent.phone,
                mode,
                billing: intent.billing,
                promotion_id: promotion.as_ref().map(|p| p.id),
                pricing: pricing.clone(),
            },
            items: intent
                .lines
                .iter()
                .zip(&chargeable)
                .map(|(l, c)| NewOrderItem {
                    candle_id: l.candle_id,
                    quantity: l.quantity,
                    unit_price: l.claimed_unit_price,
                    candle_name: c.name.clone(),
                })
                .collect(),
            destination: intent.destination,
        };

        let ledger = self.ledger.clone();
        let order_id = blocking(move || ledger.place(&draft)).await?;
        log::info!(
            "Order {} placed: subtotal={} discounted={:?} shipping={} {}",
            order_id,
            pricing.subtotal,
            pricing.discounted,
            pricing.shipping,
            currency
        );

        let request = CheckoutRequest {
            order_id,
            currency,
            customer_email: intent.email,
            line_items: build_line_items(&chargeable, &pricing, mode),
        };
        let session = self.checkout.open_session(&request).await.map_err(|e| {
            log::error!("Checkout session for order {} failed: {}", order_id, e);
            e
        })?;

        let ledger = self.ledger.clone();
        let session_id = session.id.clone();
        if let Err(e) = blocking(move || ledger.attach_session(order_id, &session_id)).await {
            log::warn!(
                "Could not store checkout session {} on order {}: {}",
                session.id,
                order_id,
                e
            );
        }

        Ok(PlacedOrder {
            order_id,
            checkout_url: session.url,
            pricing,
        })
    }

    async fn load_candles(&self, lines: &[CartLine]) -> Result<HashMap<Uuid, Candle>, DomainError> {
        let catalog = self.catalog.clone();
        let ids: Vec<Uuid> = lines.iter().map(|l| l.candle_id).collect();

        blocking(move || {
            let mut found = HashMap::with_capacity(ids.len());
            for id in ids {
                if let Some(candle) = catalog.get_by_id(id)? {
                    found.insert(id, candle);
                }
            }
            Ok(found)
        })
        .await
    }
}

fn validate_lines(lines: &[CartLine]) -> Result<(), DomainError> {
    if lines.is_empty() {
        return Err(DomainError::Validation("at least one candle is required".into()));
    }
    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        if line.quantity < 1 {
            return Err(DomainError::Validation(format!(
                "quantity for candle {} must be at least 1",
                line.candle_id
            )));
        }
        if !seen.insert(line.candle_id) {
            return Err(DomainError::Validation(format!(
                "candle {} appears more than once",
                line.candle_id
            )));
        }
    }
    Ok(())
}

fn display_name(line: &CartLine, candle: &Candle) -> String {
    match line.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => candle.name_en.clone(),
    }
}
