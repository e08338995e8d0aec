//! In-memory port implementations for service and handler tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::catalog::{Candle, Collection, Promotion};
use crate::domain::checkout::{CheckoutRequest, CheckoutSession};
use crate::domain::errors::DomainError;
use crate::domain::order::{
    Billing, Destination, MarkPaidOutcome, NewOrderItem, OrderDraft, OrderHeader, OrderItemView,
    OrderStatus, OrderView, OrderWithItems,
};
use crate::domain::ports::{CatalogStore, CheckoutGateway, Notifier, OrderLedger, PromotionStore};
use crate::domain::pricing::{Currency, FulfillmentMode};

pub fn candle(name_en: &str, huf: f64, eur: f64, czk: f64) -> Candle {
    Candle {
        id: Uuid::new_v4(),
        name_hu: name_en.to_string(),
        name_en: name_en.to_string(),
        description_hu: None,
        description_en: None,
        description_cz: None,
        image_url: None,
        price_huf: huf,
        price_eur: eur,
        price_czk: czk,
    }
}

/// A HUF pickup-point order for Anna Kovacs, 6000 before shipping.
pub fn pending_order(email: &str, promotion_id: Option<Uuid>) -> OrderView {
    OrderView {
        id: Uuid::new_v4(),
        email: email.to_string(),
        first_name: "Anna".to_string(),
        last_name: "Kovacs".to_string(),
        phone: None,
        currency: Currency::Huf,
        destination: Some(Destination::PickupPoint("Foxpost Budapest 12".to_string())),
        billing: Billing::SameAsDelivery,
        promotion_id,
        total_price: 6000,
        discounted_price: promotion_id.map(|_| 4800),
        shipping_price: 1400,
        session_id: None,
        status: OrderStatus::PendingPayment,
        created_at: Utc::now(),
        paid_at: None,
    }
}

/// Wraps `order` with a single line of two Lavender candles at 3000.
pub fn order_with_items(order: OrderView) -> OrderWithItems {
    let lavender = candle("Lavender", 3000.0, 12.0, 300.0);
    OrderWithItems {
        order,
        items: vec![OrderItemView {
            candle_id: lavender.id,
            quantity: 2,
            unit_price: 3000,
            candle_name: lavender.name_en.clone(),
            candle: lavender,
        }],
    }
}

struct StoredOrder {
    mode: FulfillmentMode,
    order: OrderWithItems,
}

#[derive(Default)]
pub struct InMemoryLedger {
    orders: Mutex<Vec<StoredOrder>>,
}

impl InMemoryLedger {
    pub fn seed(&self, order: OrderView) -> Uuid {
        let id = order.id;
        let mode = order
            .destination
            .as_ref()
            .map(Destination::mode)
            .unwrap_or(FulfillmentMode::PickupPoint);
        self.orders.lock().unwrap().push(StoredOrder {
            mode,
            order: OrderWithItems {
                order,
                items: Vec::new(),
            },
        });
        id
    }

    pub fn get(&self, id: Uuid) -> Option<OrderWithItems> {
        self.orders
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.order.order.id == id)
            .map(|s| s.order.clone())
    }

    pub fn count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<OrderWithItems> {
        self.orders
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.order.clone())
            .collect()
    }

    fn with_order<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut StoredOrder) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let stored = orders
            .iter_mut()
            .find(|s| s.order.order.id == id)
            .ok_or(DomainError::NotFound)?;
        f(stored)
    }
}

fn header_view(id: Uuid, header: &OrderHeader) -> OrderView {
    OrderView {
        id,
        email: header.email.clone(),
        first_name: header.first_name.clone(),
        last_name: header.last_name.clone(),
        phone: header.phone.clone(),
        currency: header.pricing.currency,
        destination: None,
        billing: header.billing.clone(),
        promotion_id: header.promotion_id,
        total_price: header.pricing.subtotal,
        discounted_price: header.pricing.discounted,
        shipping_price: header.pricing.shipping,
        session_id: None,
        status: OrderStatus::PendingPayment,
        created_at: Utc::now(),
        paid_at: None,
    }
}

fn item_view(item: &NewOrderItem) -> OrderItemView {
    let price = item.unit_price as f64;
    let mut placeholder = candle(&item.candle_name, price, price, price);
    placeholder.id = item.candle_id;
    OrderItemView {
        candle_id: item.candle_id,
        quantity: item.quantity,
        unit_price: item.unit_price,
        candle_name: item.candle_name.clone(),
        candle: placeholder,
    }
}

fn set_destination(stored: &mut StoredOrder, destination: &Destination) -> Result<(), DomainError> {
    if stored.mode != destination.mode() || stored.order.order.destination.is_some() {
        return Err(DomainError::Validation(
            "destination does not match the order's delivery mode".into(),
        ));
    }
    stored.order.order.destination = Some(destination.clone());
    Ok(())
}

impl OrderLedger for InMemoryLedger {
    fn create(&self, header: &OrderHeader) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        self.orders.lock().unwrap().push(StoredOrder {
            mode: header.mode,
            order: OrderWithItems {
                order: header_view(id, header),
                items: Vec::new(),
            },
        });
        Ok(id)
    }

    fn attach_items(&self, order_id: Uuid, items: &[NewOrderItem]) -> Result<(), DomainError> {
        self.with_order(order_id, |stored| {
            stored.order.items.extend(items.iter().map(item_view));
            Ok(())
        })
    }

    fn attach_destination(
        &self,
        order_id: Uuid,
        destination: &Destination,
    ) -> Result<(), DomainError> {
        self.with_order(order_id, |stored| set_destination(stored, destination))
    }

    fn place(&self, draft: &OrderDraft) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        let mut stored = StoredOrder {
            mode: draft.header.mode,
            order: OrderWithItems {
                order: header_view(id, &draft.header),
                items: draft.items.iter().map(item_view).collect(),
            },
        };
        set_destination(&mut stored, &draft.destination)?;
        self.orders.lock().unwrap().push(stored);
        Ok(id)
    }

    fn attach_session(&self, order_id: Uuid, session_id: &str) -> Result<(), DomainError> {
        self.with_order(order_id, |stored| {
            stored.order.order.session_id = Some(session_id.to_string());
            Ok(())
        })
    }

    fn mark_paid(
        &self,
        order_id: Uuid,
        session_id: Option<&str>,
    ) -> Result<MarkPaidOutcome, DomainError> {
        self.with_order(order_id, |stored| {
            let order = &mut stored.order.order;
            if order.status == OrderStatus::Paid {
                return Ok(MarkPaidOutcome::AlreadyPaid);
            }
            order.status = OrderStatus::Paid;
            order.paid_at = Some(Utc::now());
            if let Some(session_id) = session_id {
                order.session_id = Some(session_id.to_string());
            }
            Ok(MarkPaidOutcome::Transitioned)
        })
    }

    fn fetch_with_items(&self, order_id: Uuid) -> Result<OrderWithItems, DomainError> {
        self.get(order_id).ok_or(DomainError::NotFound)
    }
}

#[derive(Default)]
pub struct InMemoryCatalog {
    candles: Vec<Candle>,
    collections: Vec<(Collection, Vec<Uuid>)>,
}

impl InMemoryCatalog {
    pub fn with(candles: Vec<Candle>) -> Self {
        Self {
            candles,
            collections: Vec::new(),
        }
    }

    pub fn collection(mut self, name: &str, members: &[Uuid]) -> Self {
        self.collections.push((
            Collection {
                name: name.to_string(),
                description: None,
            },
            members.to_vec(),
        ));
        self
    }
}

impl CatalogStore for InMemoryCatalog {
    fn get_by_id(&self, id: Uuid) -> Result<Option<Candle>, DomainError> {
        Ok(self.candles.iter().find(|c| c.id == id).cloned())
    }

    fn list_candles(&self) -> Result<Vec<Candle>, DomainError> {
        Ok(self.candles.clone())
    }

    fn list_collections(&self) -> Result<Vec<Collection>, DomainError> {
        Ok(self.collections.iter().map(|(c, _)| c.clone()).collect())
    }

    fn collection_candles(&self, name: &str) -> Result<Option<Vec<Candle>>, DomainError> {
        Ok(self
            .collections
            .iter()
            .find(|(c, _)| c.name == name)
            .map(|(_, members)| {
                self.candles
                    .iter()
                    .filter(|c| members.contains(&c.id))
                    .cloned()
                    .collect()
            }))
    }
}

#[derive(Default)]
pub struct InMemoryPromotions {
    promotions: Mutex<Vec<Promotion>>,
    redemptions: Mutex<HashSet<(Uuid, String)>>,
}

impl InMemoryPromotions {
    pub fn insert(&self, name: &str, percentage: i32) -> Promotion {
        let promotion = Promotion {
            id: Uuid::new_v4(),
            name: name.to_string(),
            percentage,
        };
        self.promotions.lock().unwrap().push(promotion.clone());
        promotion
    }

    pub fn redeem(&self, promotion_id: Uuid, email: &str) {
        self.redemptions
            .lock()
            .unwrap()
            .insert((promotion_id, email.to_string()));
    }

    pub fn is_recorded(&self, promotion_id: Uuid, email: &str) -> bool {
        self.redemptions
            .lock()
            .unwrap()
            .contains(&(promotion_id, email.to_string()))
    }

    pub fn redemption_count(&self) -> usize {
        self.redemptions.lock().unwrap().len()
    }
}

impl PromotionStore for InMemoryPromotions {
    fn find_by_name(&self, name: &str) -> Result<Option<Promotion>, DomainError> {
        Ok(self
            .promotions
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    fn is_redeemed(&self, promotion_id: Uuid, email: &str) -> Result<bool, DomainError> {
        Ok(self.is_recorded(promotion_id, email))
    }

    fn record_redemption(&self, promotion_id: Uuid, email: &str) -> Result<bool, DomainError> {
        Ok(self
            .redemptions
            .lock()
            .unwrap()
            .insert((promotion_id, email.to_string())))
    }
}

/// Opens sessions `cs_test_1`, `cs_test_2`, ... and remembers every request.
#[derive(Default)]
pub struct RecordingCheckout {
    requests: Mutex<Vec<CheckoutRequest>>,
}

impl RecordingCheckout {
    pub fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckoutGateway for RecordingCheckout {
    async fn open_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, DomainError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        Ok(CheckoutSession {
            id: format!("cs_test_{}", requests.len()),
            url: format!("https://pay.test/{}", request.order_id),
        })
    }
}

pub struct FailingCheckout;

#[async_trait]
impl CheckoutGateway for FailingCheckout {
    async fn open_session(
        &self,
        _request: &CheckoutRequest,
    ) -> Result<CheckoutSession, DomainError> {
        Err(DomainError::PaymentProvider("connection refused".into()))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Uuid>>,
    confirmations: Mutex<Vec<Uuid>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Uuid> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn confirmations(&self) -> Vec<Uuid> {
        self.confirmations.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_order_notification(&self, order: &OrderWithItems) -> Result<(), DomainError> {
        self.notifications.lock().unwrap().push(order.order.id);
        Ok(())
    }

    async fn send_order_confirmation(&self, order: &OrderWithItems) -> Result<(), DomainError> {
        self.confirmations.lock().unwrap().push(order.order.id);
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_order_notification(&self, _order: &OrderWithItems) -> Result<(), DomainError> {
        Err(DomainError::Notification("mail API returned 502".into()))
    }

    async fn send_order_confirmation(&self, _order: &OrderWithItems) -> Result<(), DomainError> {
        Err(DomainError::Notification("mail API returned 502".into()))
    }
}
