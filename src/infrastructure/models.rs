use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::schema::{
    candles, collections, order_items, order_outbox, orders, promotion_redemptions, promotions,
};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = candles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CandleRow {
    pub id: Uuid,
    pub name_hu: String,
    pub name_en: String,
    pub description_hu: Option<String>,
    pub description_en: Option<String>,
    pub description_cz: Option<String>,
    pub image_url: Option<String>,
    pub price_huf: f64,
    pub price_eur: f64,
    pub price_czk: f64,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = collections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CollectionRow {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = promotions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PromotionRow {
    pub id: Uuid,
    pub name: String,
    pub percentage: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = promotion_redemptions)]
pub struct NewRedemptionRow<'a> {
    pub promotion_id: Uuid,
    pub email: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub currency: String,
    pub is_home_delivery: bool,
    pub pickup_point: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
    pub street: Option<String>,
    pub line1: Option<String>,
    pub billing_address_match: bool,
    pub billing_country: Option<String>,
    pub billing_city: Option<String>,
    pub billing_zip: Option<String>,
    pub billing_street: Option<String>,
    pub billing_line1: Option<String>,
    pub promotion_id: Option<Uuid>,
    pub total_price: i64,
    pub discounted_price: Option<i64>,
    pub shipping_price: i64,
    pub session_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub currency: String,
    pub is_home_delivery: bool,
    pub billing_address_match: bool,
    pub billing_country: Option<String>,
    pub billing_city: Option<String>,
    pub billing_zip: Option<String>,
    pub billing_street: Option<String>,
    pub billing_line1: Option<String>,
    pub promotion_id: Option<Uuid>,
    pub total_price: i64,
    pub discounted_price: Option<i64>,
    pub shipping_price: i64,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(primary_key(order_id, candle_id))]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub order_id: Uuid,
    pub candle_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub candle_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: Uuid,
    pub candle_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
    pub candle_name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_outbox)]
pub struct NewOutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
}
