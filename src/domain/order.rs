use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::catalog::Candle;
use super::errors::DomainError;
use super::pricing::{Currency, FulfillmentMode, PricedCart};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    PendingPayment,
    Paid,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_payment" => Ok(OrderStatus::PendingPayment),
            "paid" => Ok(OrderStatus::Paid),
            other => Err(DomainError::Persistence(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub country: String,
    pub city: String,
    pub zip: String,
    pub street: String,
    pub line1: String,
}

/// Where the order goes. Exactly one of the two is ever recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    HomeDelivery(Address),
    PickupPoint(String),
}

impl Destination {
    pub fn mode(&self) -> FulfillmentMode {
        match self {
            Destination::HomeDelivery(_) => FulfillmentMode::HomeDelivery,
            Destination::PickupPoint(_) => FulfillmentMode::PickupPoint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Billing {
    SameAsDelivery,
    Separate(Address),
}

/// Order header as recorded at intent time, totals already computed.
#[derive(Debug, Clone)]
pub struct OrderHeader {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub mode: FulfillmentMode,
    pub billing: Billing,
    pub promotion_id: Option<Uuid>,
    pub pricing: PricedCart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub candle_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub candle_name: String,
}

/// Everything needed to place an order in one go.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub header: OrderHeader,
    pub items: Vec<NewOrderItem>,
    pub destination: Destination,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub currency: Currency,
    /// `None` while the destination has not been attached yet.
    pub destination: Option<Destination>,
    pub billing: Billing,
    pub promotion_id: Option<Uuid>,
    pub total_price: i64,
    pub discounted_price: Option<i64>,
    pub shipping_price: i64,
    pub session_id: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub candle_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub candle_name: String,
    pub candle: Candle,
}

#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: OrderView,
    pub items: Vec<OrderItemView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkPaidOutcome {
    /// This call moved the order from `pending_payment` to `paid`.
    Transitioned,
    AlreadyPaid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_storage_text() {
        for status in [OrderStatus::PendingPayment, OrderStatus::Paid] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_persistence_error() {
        assert!(matches!(
            "cancelled".parse::<OrderStatus>(),
            Err(DomainError::Persistence(_))
        ));
    }

    #[test]
    fn destination_reports_its_mode() {
        let pickup = Destination::PickupPoint("Foxpost Budapest 12".to_string());
        assert_eq!(pickup.mode(), FulfillmentMode::PickupPoint);
    }
}
