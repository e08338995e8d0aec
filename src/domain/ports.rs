use async_trait::async_trait;
use uuid::Uuid;

use super::catalog::{Candle, Collection, Promotion};
use super::checkout::{CheckoutRequest, CheckoutSession, PaymentEvent};
use super::errors::DomainError;
use super::order::{
    Destination, MarkPaidOutcome, NewOrderItem, OrderDraft, OrderHeader, OrderWithItems,
};

/// Owns order records and their state transitions.
pub trait OrderLedger: Send + Sync + 'static {
    /// Persists the header in `pending_payment`.
    fn create(&self, header: &OrderHeader) -> Result<Uuid, DomainError>;
    fn attach_items(&self, order_id: Uuid, items: &[NewOrderItem]) -> Result<(), DomainError>;
    /// Fails with `Validation` if the destination does not match the mode
    /// recorded on the header.
    fn attach_destination(
        &self,
        order_id: Uuid,
        destination: &Destination,
    ) -> Result<(), DomainError>;
    /// `create` + `attach_items` + `attach_destination` as one atomic unit.
    fn place(&self, draft: &OrderDraft) -> Result<Uuid, DomainError>;
    fn attach_session(&self, order_id: Uuid, session_id: &str) -> Result<(), DomainError>;
    /// Conditional `pending_payment -> paid`. Safe to repeat.
    fn mark_paid(
        &self,
        order_id: Uuid,
        session_id: Option<&str>,
    ) -> Result<MarkPaidOutcome, DomainError>;
    fn fetch_with_items(&self, order_id: Uuid) -> Result<OrderWithItems, DomainError>;
}

pub trait CatalogStore: Send + Sync + 'static {
    fn get_by_id(&self, id: Uuid) -> Result<Option<Candle>, DomainError>;
    fn list_candles(&self) -> Result<Vec<Candle>, DomainError>;
    fn list_collections(&self) -> Result<Vec<Collection>, DomainError>;
    /// `None` when no collection has that name.
    fn collection_candles(&self, name: &str) -> Result<Option<Vec<Candle>>, DomainError>;
}

pub trait PromotionStore: Send + Sync + 'static {
    fn find_by_name(&self, name: &str) -> Result<Option<Promotion>, DomainError>;
    fn is_redeemed(&self, promotion_id: Uuid, email: &str) -> Result<bool, DomainError>;
    /// Returns `false` when the pair was already recorded.
    fn record_redemption(&self, promotion_id: Uuid, email: &str) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait CheckoutGateway: Send + Sync + 'static {
    async fn open_session(&self, request: &CheckoutRequest)
        -> Result<CheckoutSession, DomainError>;
}

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Tells the shop a paid order came in.
    async fn send_order_notification(&self, order: &OrderWithItems) -> Result<(), DomainError>;
    /// Thanks the customer for their order.
    async fn send_order_confirmation(&self, order: &OrderWithItems) -> Result<(), DomainError>;
}

/// Verifies and decodes inbound payment-provider notifications.
pub trait PaymentEventDecoder: Send + Sync + 'static {
    /// Only a failed signature check is an error; anything the decoder cannot
    /// make sense of comes back as `PaymentEvent::Malformed`.
    fn decode(&self, payload: &[u8], signature: Option<&str>) -> Result<PaymentEvent, DomainError>;
}
