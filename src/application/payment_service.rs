use std::sync::Arc;

use uuid::Uuid;

use super::blocking;
use super::promotion_gate::PromotionGate;
use crate::domain::checkout::PaymentEvent;
use crate::domain::errors::DomainError;
use crate::domain::order::MarkPaidOutcome;
use crate::domain::ports::{Notifier, OrderLedger, PaymentEventDecoder};

/// Drives orders to `paid` from either the explicit client callback or the
/// provider webhook. Both triggers converge on [`PaymentService::confirm`].
#[derive(Clone)]
pub struct PaymentService {
    ledger: Arc<dyn OrderLedger>,
    promotions: PromotionGate,
    notifier: Arc<dyn Notifier>,
    events: Arc<dyn PaymentEventDecoder>,
}

impl PaymentService {
    pub fn new(
        ledger: Arc<dyn OrderLedger>,
        promotions: PromotionGate,
        notifier: Arc<dyn Notifier>,
        events: Arc<dyn PaymentEventDecoder>,
    ) -> Self {
        Self {
            ledger,
            promotions,
            notifier,
            events,
        }
    }

    /// Marks the order paid. Follow-up work (redemption, emails) is best
    /// effort and never fails the call once the payment is recorded.
    pub async fn confirm(
        &self,
        order_id: Uuid,
        session_id: Option<String>,
    ) -> Result<MarkPaidOutcome, DomainError> {
        let ledger = self.ledger.clone();
        let outcome =
            blocking(move || ledger.mark_paid(order_id, session_id.as_deref())).await?;

        match outcome {
            MarkPaidOutcome::Transitioned => log::info!("Order {} marked paid", order_id),
            MarkPaidOutcome::AlreadyPaid => log::info!("Order {} was already paid", order_id),
        }

        self.after_payment(order_id, outcome).await;
        Ok(outcome)
    }

    /// Verifies and applies one webhook delivery. Only a bad signature is an
    /// error; everything after verification is logged and acknowledged.
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<(), DomainError> {
        let event = self.events.decode(payload, signature).map_err(|e| {
            log::warn!("Webhook signature verification failed: {}", e);
            e
        })?;

        match event {
            PaymentEvent::CheckoutCompleted {
                order_id,
                session_id,
            } => {
                log::info!("Checkout completed: order={} session={}", order_id, session_id);
                if let Err(e) = self.confirm(order_id, Some(session_id)).await {
                    log::error!("Failed to mark order {} paid from webhook: {}", order_id, e);
                }
            }
            PaymentEvent::PaymentFailed { reference } => {
                log::warn!("Payment failed: {}", reference.as_deref().unwrap_or("<unknown>"));
            }
            PaymentEvent::Other(kind) => log::info!("Unhandled event type: {}", kind),
            PaymentEvent::Malformed(reason) => {
                log::warn!("Ignoring malformed webhook event: {}", reason)
            }
        }
        Ok(())
    }

    async fn after_payment(&self, order_id: Uuid, outcome: MarkPaidOutcome) {
        let ledger = self.ledger.clone();
        let order = match blocking(move || ledger.fetch_with_items(order_id)).await {
            Ok(order) => order,
            Err(e) => {
                log::warn!("Failed to get order {} details for notification: {}", order_id, e);
                return;
            }
        };

        // Recording is idempotent, so a retry after a partial failure is safe.
        if let Some(promotion_id) = order.order.promotion_id {
            match self
                .promotions
                .record_redemption(promotion_id, &order.order.email)
                .await
            {
                Ok(true) => log::info!(
                    "Promotion usage saved: promotion_id={} email={}",
                    promotion_id,
                    order.order.email
                ),
                Ok(false) => log::debug!("Promotion {} already recorded", promotion_id),
                Err(e) => log::error!("Failed to save promotion usage: {}", e),
            }
        }

        if outcome == MarkPaidOutcome::AlreadyPaid {
            return;
        }

        if let Err(e) = self.notifier.send_order_notification(&order).await {
            log::warn!("Failed to send order notification email: {}", e);
        }
        if let Err(e) = self.notifier.send_order_confirmation(&order).await {
            log::warn!("Failed to send order confirmation email: {}", e);
        }
    }
}
