use uuid::Uuid;

use super::pricing::{Currency, FulfillmentMode, PricedCart};

/// Minor units per whole currency unit as the payment processor counts them.
pub const MINOR_UNITS: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLineItem {
    pub name: String,
    /// Amount per unit in minor currency units.
    pub unit_amount: i64,
    pub quantity: i64,
}

/// A priced line ready to be charged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeableLine {
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub order_id: Uuid,
    pub currency: Currency,
    pub customer_email: String,
    pub line_items: Vec<CheckoutLineItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// A payment-provider notification after signature verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    CheckoutCompleted { order_id: Uuid, session_id: String },
    PaymentFailed { reference: Option<String> },
    Other(String),
    /// Signed correctly but not understood.
    Malformed(String),
}

pub fn shipping_line_name(mode: FulfillmentMode) -> &'static str {
    match mode {
        FulfillmentMode::HomeDelivery => "Home Delivery",
        FulfillmentMode::PickupPoint => "Pickup Point Delivery",
    }
}

/// Translates a priced cart into processor line items.
///
/// The promotion is spread over each candle line's unit amount. Shipping is
/// appended as its own line when non-zero and is never discounted.
pub fn build_line_items(
    lines: &[ChargeableLine],
    priced: &PricedCart,
    mode: FulfillmentMode,
) -> Vec<CheckoutLineItem> {
    let keep = 100 - i64::from(priced.discount_percentage.unwrap_or(0));

    let mut items: Vec<CheckoutLineItem> = lines
        .iter()
        .map(|l| CheckoutLineItem {
            name: l.name.clone(),
            unit_amount: l.unit_price * MINOR_UNITS * keep / 100,
            quantity: i64::from(l.quantity),
        })
        .collect();

    if priced.shipping > 0 {
        items.push(CheckoutLineItem {
            name: shipping_line_name(mode).to_string(),
            unit_amount: priced.shipping * MINOR_UNITS,
            quantity: 1,
        });
    }

    items
}
