use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    Address, Billing, Destination, MarkPaidOutcome, NewOrderItem, OrderDraft, OrderHeader,
    OrderItemView, OrderStatus, OrderView, OrderWithItems,
};
use crate::domain::ports::OrderLedger;
use crate::domain::pricing::FulfillmentMode;
use crate::schema::{candles, order_items, order_outbox, orders};

use super::models::{
    CandleRow, NewOrderItemRow, NewOrderRow, NewOutboxEventRow, OrderItemRow, OrderRow,
};

// ── Row mapping ──────────────────────────────────────────────────────────────

fn destination_of(row: &OrderRow) -> Option<Destination> {
    if !row.is_home_delivery {
        return row.pickup_point.clone().map(Destination::PickupPoint);
    }
    match (&row.country, &row.city, &row.zipcode, &row.street) {
        (Some(country), Some(city), Some(zip), Some(street)) => {
            Some(Destination::HomeDelivery(Address {
                country: country.clone(),
                city: city.clone(),
                zip: zip.clone(),
                street: street.clone(),
                line1: row.line1.clone().unwrap_or_default(),
            }))
        }
        _ => None,
    }
}

fn billing_of(row: &OrderRow) -> Billing {
    if row.billing_address_match {
        return Billing::SameAsDelivery;
    }
    Billing::Separate(Address {
        country: row.billing_country.clone().unwrap_or_default(),
        city: row.billing_city.clone().unwrap_or_default(),
        zip: row.billing_zip.clone().unwrap_or_default(),
        street: row.billing_street.clone().unwrap_or_default(),
        line1: row.billing_line1.clone().unwrap_or_default(),
    })
}

impl TryFrom<OrderRow> for OrderView {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let destination = destination_of(&row);
        let billing = billing_of(&row);
        Ok(OrderView {
            id: row.id,
            currency: row
                .currency
                .parse()
                .map_err(|e: DomainError| DomainError::Persistence(e.to_string()))?,
            status: row.status.parse()?,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
            destination,
            billing,
            promotion_id: row.promotion_id,
            total_price: row.total_price,
            discounted_price: row.discounted_price,
            shipping_price: row.shipping_price,
            session_id: row.session_id,
            created_at: row.created_at,
            paid_at: row.paid_at,
        })
    }
}

// ── Statements shared by the single-step and transactional paths ─────────────

fn insert_header(conn: &mut PgConnection, header: &OrderHeader) -> Result<Uuid, DomainError> {
    let order_id = Uuid::new_v4();
    let billing = match &header.billing {
        Billing::SameAsDelivery => None,
        Billing::Separate(address) => Some(address),
    };

    diesel::insert_into(orders::table)
        .values(&NewOrderRow {
            id: order_id,
            email: header.email.clone(),
            first_name: header.first_name.clone(),
            last_name: header.last_name.clone(),
            phone: header.phone.clone(),
            currency: header.pricing.currency.code().to_string(),
            is_home_delivery: header.mode == FulfillmentMode::HomeDelivery,
            billing_address_match: billing.is_none(),
            billing_country: billing.map(|a| a.country.clone()),
            billing_city: billing.map(|a| a.city.clone()),
            billing_zip: billing.map(|a| a.zip.clone()),
            billing_street: billing.map(|a| a.street.clone()),
            billing_line1: billing.map(|a| a.line1.clone()),
            promotion_id: header.promotion_id,
            total_price: header.pricing.subtotal,
            discounted_price: header.pricing.discounted,
            shipping_price: header.pricing.shipping,
            status: OrderStatus::PendingPayment.as_str().to_string(),
        })
        .execute(conn)?;

    Ok(order_id)
}

fn insert_items(
    conn: &mut PgConnection,
    order_id: Uuid,
    items: &[NewOrderItem],
) -> Result<(), DomainError> {
    let rows: Vec<NewOrderItemRow> = items
        .iter()
        .map(|i| NewOrderItemRow {
            order_id,
            candle_id: i.candle_id,
            quantity: i.quantity,
            unit_price: i.unit_price,
            candle_name: i.candle_name.clone(),
        })
        .collect();
    diesel::insert_into(order_items::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

fn order_exists(conn: &mut PgConnection, order_id: Uuid) -> Result<bool, DomainError> {
    Ok(diesel::select(diesel::dsl::exists(
        orders::table.filter(orders::id.eq(order_id)),
    ))
    .get_result(conn)?)
}

fn set_destination(
    conn: &mut PgConnection,
    order_id: Uuid,
    destination: &Destination,
) -> Result<(), DomainError> {
    let target = orders::table.filter(orders::id.eq(order_id));
    let updated = match destination {
        Destination::HomeDelivery(a) => diesel::update(
            target.filter(orders::is_home_delivery.eq(true)),
        )
        .set((
            orders::country.eq(&a.country),
            orders::city.eq(&a.city),
            orders::zipcode.eq(&a.zip),
            orders::street.eq(&a.street),
            orders::line1.eq(&a.line1),
            orders::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?,
        Destination::PickupPoint(point) => diesel::update(
            target.filter(orders::is_home_delivery.eq(false)),
        )
        .set((
            orders::pickup_point.eq(point),
            orders::updated_at.eq(Utc::now()),
        ))
        .execute(conn)?,
    };

    if updated == 0 {
        return Err(if order_exists(conn, order_id)? {
            DomainError::Validation(
                "destination does not match the order's fulfillment mode".to_string(),
            )
        } else {
            DomainError::NotFound
        });
    }
    Ok(())
}

fn append_event(
    conn: &mut PgConnection,
    order_id: Uuid,
    event_type: &str,
    payload: Value,
) -> Result<(), DomainError> {
    diesel::insert_into(order_outbox::table)
        .values(&NewOutboxEventRow {
            id: Uuid::new_v4(),
            aggregate_type: "Order".to_string(),
            aggregate_id: order_id.to_string(),
            event_type: event_type.to_string(),
            payload,
        })
        .execute(conn)?;
    Ok(())
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderLedger {
    pool: DbPool,
}

impl DieselOrderLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderLedger for DieselOrderLedger {
    fn create(&self, header: &OrderHeader) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;
        insert_header(&mut conn, header)
    }

    fn attach_items(&self, order_id: Uuid, items: &[NewOrderItem]) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        insert_items(&mut conn, order_id, items)
    }

    fn attach_destination(
        &self,
        order_id: Uuid,
        destination: &Destination,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        set_destination(&mut conn, order_id, destination)
    }

    fn place(&self, draft: &OrderDraft) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order_id = insert_header(conn, &draft.header)?;
            insert_items(conn, order_id, &draft.items)?;
            set_destination(conn, order_id, &draft.destination)?;

            let lines: Vec<Value> = draft
                .items
                .iter()
                .map(|i| {
                    json!({
                        "candle_id": i.candle_id,
                        "quantity": i.quantity,
                        "unit_price": i.unit_price,
                    })
                })
                .collect();
            let pricing = &draft.header.pricing;
            append_event(
                conn,
                order_id,
                "OrderPlaced",
                json!({
                    "order_id": order_id,
                    "email": draft.header.email,
                    "currency": pricing.currency.code(),
                    "total_price": pricing.subtotal,
                    "discounted_price": pricing.discounted,
                    "shipping_price": pricing.shipping,
                    "status": OrderStatus::PendingPayment.as_str(),
                    "lines": lines,
                }),
            )?;

            Ok(order_id)
        })
    }

    fn attach_session(&self, order_id: Uuid, session_id: &str) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
            .set((
                orders::session_id.eq(session_id),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    fn mark_paid(
        &self,
        order_id: Uuid,
        session_id: Option<&str>,
    ) -> Result<MarkPaidOutcome, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let now = Utc::now();
            // Guarded on the current status so concurrent triggers race safely:
            // exactly one of them sees a row updated.
            let pending = orders::table
                .filter(orders::id.eq(order_id))
                .filter(orders::status.eq(OrderStatus::PendingPayment.as_str()));
            let paid = (
                orders::status.eq(OrderStatus::Paid.as_str()),
                orders::paid_at.eq(now),
                orders::updated_at.eq(now),
            );
            let updated = match session_id {
                Some(session_id) => diesel::update(pending)
                    .set((paid, orders::session_id.eq(session_id)))
                    .execute(conn)?,
                None => diesel::update(pending).set(paid).execute(conn)?,
            };

            if updated == 1 {
                append_event(
                    conn,
                    order_id,
                    "OrderPaid",
                    json!({
                        "order_id": order_id,
                        "session_id": session_id,
                        "status": OrderStatus::Paid.as_str(),
                        "paid_at": now,
                    }),
                )?;
                return Ok(MarkPaidOutcome::Transitioned);
            }

            if order_exists(conn, order_id)? {
                Ok(MarkPaidOutcome::AlreadyPaid)
            } else {
                Err(DomainError::NotFound)
            }
        })
    }

    fn fetch_with_items(&self, order_id: Uuid) -> Result<OrderWithItems, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(order_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(DomainError::NotFound)?;

        let rows: Vec<(OrderItemRow, CandleRow)> = OrderItemRow::belonging_to(&order)
            .inner_join(candles::table)
            .select((OrderItemRow::as_select(), CandleRow::as_select()))
            .order(order_items::created_at.asc())
            .load(&mut conn)?;

        Ok(OrderWithItems {
            order: order.try_into()?,
            items: rows
                .into_iter()
                .map(|(item, candle)| OrderItemView {
                    candle_id: item.candle_id,
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    candle_name: item.candle_name,
                    candle: candle.into(),
                })
                .collect(),
        })
    }
}
