use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::domain::order::{Destination, OrderWithItems};
use crate::domain::ports::Notifier;

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub from: String,
    pub shop_recipients: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MailMessage<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    text: String,
}

/// Sends mail through a transactional mail HTTP API.
pub struct HttpMailer {
    config: MailConfig,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| DomainError::Notification(e.to_string()))?;
        Ok(Self { config, client })
    }

    async fn send(&self, message: MailMessage<'_>) -> Result<(), DomainError> {
        let mut request = self.client.post(&self.config.api_url).json(&message);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Notification(e.to_string()))?;
        if !response.status().is_success() {
            return Err(DomainError::Notification(format!(
                "mail API returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send_order_notification(&self, order: &OrderWithItems) -> Result<(), DomainError> {
        if self.config.shop_recipients.is_empty() {
            log::debug!("No shop recipients configured, skipping order notification");
            return Ok(());
        }
        self.send(MailMessage {
            from: &self.config.from,
            to: self.config.shop_recipients.iter().map(String::as_str).collect(),
            subject: "New Order Received - ELINDOR",
            text: order_summary(order),
        })
        .await
    }

    async fn send_order_confirmation(&self, order: &OrderWithItems) -> Result<(), DomainError> {
        let text = format!(
            "Dear {},\n\nThank you for your order!\n\n{}",
            order.order.first_name,
            order_summary(order)
        );
        self.send(MailMessage {
            from: &self.config.from,
            to: vec![order.order.email.as_str()],
            subject: "Thank you for your order - ELINDOR",
            text,
        })
        .await
    }
}

/// Used when no mail API is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_order_notification(&self, order: &OrderWithItems) -> Result<(), DomainError> {
        log::info!("Order notification:\n{}", order_summary(order));
        Ok(())
    }

    async fn send_order_confirmation(&self, order: &OrderWithItems) -> Result<(), DomainError> {
        log::info!(
            "Order confirmation for {} (order {})",
            order.order.email,
            order.order.id
        );
        Ok(())
    }
}

/// Plain-text order summary shared by both messages.
pub fn order_summary(order: &OrderWithItems) -> String {
    let o = &order.order;
    let currency = o.currency.code().to_uppercase();
    let mut out = String::new();

    let _ = writeln!(out, "Order ID: {}", o.id);
    let _ = writeln!(out, "Customer: {} {} <{}>", o.first_name, o.last_name, o.email);
    let _ = writeln!(out, "Status: {}", o.status);

    match &o.destination {
        Some(Destination::HomeDelivery(a)) => {
            let _ = write!(out, "Delivery: Home Delivery, {}", a.street);
            if !a.line1.is_empty() {
                let _ = write!(out, ", {}", a.line1);
            }
            let _ = writeln!(out, ", {} {}, {}", a.zip, a.city, a.country);
        }
        Some(Destination::PickupPoint(point)) => {
            let _ = writeln!(out, "Delivery: Pickup Point - {}", point);
        }
        None => {}
    }

    out.push_str("\nItems:\n");
    for item in &order.items {
        let _ = writeln!(
            out,
            "- {} x{} @ {} {} = {} {}",
            item.candle_name,
            item.quantity,
            item.unit_price,
            currency,
            item.unit_price * i64::from(item.quantity),
            currency
        );
    }

    let _ = writeln!(out, "\nSubtotal: {} {}", o.total_price, currency);
    if let Some(discounted) = o.discounted_price {
        let _ = writeln!(out, "After discount: {} {}", discounted, currency);
    }
    let _ = writeln!(out, "Shipping: {} {}", o.shipping_price, currency);
    let _ = writeln!(
        out,
        "Total: {} {}",
        o.discounted_price.unwrap_or(o.total_price) + o.shipping_price,
        currency
    );
    if let Some(session) = &o.session_id {
        let _ = writeln!(out, "Payment session: {}", session);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{order_with_items, pending_order};

    #[test]
    fn summary_lists_items_and_totals() {
        let mut order = pending_order("anna@example.com", None);
        order.discounted_price = Some(4800);
        order.total_price = 6000;
        order.shipping_price = 1400;
        let summary = order_summary(&order_with_items(order));

        assert!(summary.contains("Customer: Anna Kovacs <anna@example.com>"));
        assert!(summary.contains("Delivery: Pickup Point - Foxpost Budapest 12"));
        assert!(summary.contains("- Lavender x2 @ 3000 HUF = 6000 HUF"));
        assert!(summary.contains("After discount: 4800 HUF"));
        assert!(summary.contains("Total: 6200 HUF"));
    }

    #[actix_web::test]
    async fn log_notifier_never_fails() {
        let order = order_with_items(pending_order("anna@example.com", None));
        assert!(LogNotifier.send_order_notification(&order).await.is_ok());
        assert!(LogNotifier.send_order_confirmation(&order).await.is_ok());
    }
}
