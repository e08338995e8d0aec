use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use uuid::Uuid;

use crate::domain::checkout::{CheckoutRequest, CheckoutSession, PaymentEvent};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CheckoutGateway, PaymentEventDecoder};

type HmacSha256 = Hmac<Sha256>;

const CHECKOUT_COMPLETED: &str = "checkout.session.completed";
const PAYMENT_FAILED: &str = "payment_intent.payment_failed";

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
    pub success_url: String,
    pub cancel_url: String,
}

// ── Checkout sessions ────────────────────────────────────────────────────────

pub struct StripeCheckoutGateway {
    config: StripeConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

impl StripeCheckoutGateway {
    pub fn new(config: StripeConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| DomainError::PaymentProvider(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Form fields of a `POST /v1/checkout/sessions` call.
    fn session_form(&self, request: &CheckoutRequest) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), self.config.success_url.clone()),
            ("cancel_url".to_string(), self.config.cancel_url.clone()),
            (
                "client_reference_id".to_string(),
                request.order_id.to_string(),
            ),
            ("customer_email".to_string(), request.customer_email.clone()),
        ];

        for (i, item) in request.line_items.iter().enumerate() {
            let prefix = format!("line_items[{i}]");
            form.push((
                format!("{prefix}[price_data][currency]"),
                request.currency.code().to_string(),
            ));
            form.push((
                format!("{prefix}[price_data][product_data][name]"),
                item.name.clone(),
            ));
            form.push((
                format!("{prefix}[price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ));
            form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
        }
        form
    }
}

#[async_trait]
impl CheckoutGateway for StripeCheckoutGateway {
    async fn open_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, DomainError> {
        let url = format!(
            "{}/v1/checkout/sessions",
            self.config.api_base.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.secret_key, Some(""))
            .form(&self.session_form(request))
            .send()
            .await
            .map_err(|e| DomainError::PaymentProvider(format!("Stripe API error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::PaymentProvider(format!(
                "Stripe returned {status}: {body}"
            )));
        }

        let session: SessionResponse = response.json().await.map_err(|e| {
            DomainError::PaymentProvider(format!("Failed to parse Stripe response: {e}"))
        })?;
        let url = session.url.ok_or_else(|| {
            DomainError::PaymentProvider(format!("session {} has no redirect URL", session.id))
        })?;

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }
}

// ── Webhooks ─────────────────────────────────────────────────────────────────

/// Checks `Stripe-Signature` headers (`t=<unix>,v1=<hex hmac>`) against the
/// endpoint secret and decodes the events we act on.
pub struct StripeWebhookVerifier {
    secret: String,
    tolerance_secs: i64,
}

#[derive(Debug, Deserialize)]
struct StripeEvent {
    #[serde(rename = "type")]
    kind: String,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: Value,
}

fn signature_mac(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

/// Hex signature Stripe would send for `payload` at `timestamp`.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    hex::encode(signature_mac(secret, timestamp, payload).finalize().into_bytes())
}

impl StripeWebhookVerifier {
    pub fn new(secret: impl Into<String>, tolerance_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs,
        }
    }

    pub fn verify(&self, payload: &[u8], header: &str, now: i64) -> Result<(), DomainError> {
        let mut timestamp = None;
        let mut candidates = Vec::new();
        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", v)) => timestamp = v.parse::<i64>().ok(),
                Some(("v1", v)) => candidates.push(v),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(DomainError::InvalidSignature)?;
        if (now - timestamp).abs() > self.tolerance_secs {
            return Err(DomainError::InvalidSignature);
        }

        let matched = candidates
            .into_iter()
            .filter_map(|sig| hex::decode(sig).ok())
            .any(|sig| {
                signature_mac(&self.secret, timestamp, payload)
                    .verify_slice(&sig)
                    .is_ok()
            });
        if matched {
            Ok(())
        } else {
            Err(DomainError::InvalidSignature)
        }
    }
}

fn parse_event(payload: &[u8]) -> PaymentEvent {
    let event: StripeEvent = match serde_json::from_slice(payload) {
        Ok(event) => event,
        Err(e) => return PaymentEvent::Malformed(e.to_string()),
    };
    let object = &event.data.object;
    let field = |name: &str| object.get(name).and_then(Value::as_str);

    match event.kind.as_str() {
        CHECKOUT_COMPLETED => {
            let order_id = field("client_reference_id").and_then(|s| Uuid::parse_str(s).ok());
            match (order_id, field("id")) {
                (Some(order_id), Some(session_id)) => PaymentEvent::CheckoutCompleted {
                    order_id,
                    session_id: session_id.to_string(),
                },
                _ => PaymentEvent::Malformed(
                    "checkout session without a usable order reference".to_string(),
                ),
            }
        }
        PAYMENT_FAILED => PaymentEvent::PaymentFailed {
            reference: field("id").map(str::to_string),
        },
        other => PaymentEvent::Other(other.to_string()),
    }
}

impl PaymentEventDecoder for StripeWebhookVerifier {
    fn decode(&self, payload: &[u8], signature: Option<&str>) -> Result<PaymentEvent, DomainError> {
        let header = signature.ok_or(DomainError::InvalidSignature)?;
        self.verify(payload, header, chrono::Utc::now().timestamp())?;
        Ok(parse_event(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::CheckoutLineItem;
    use crate::domain::pricing::Currency;

    const SECRET: &str = "whsec_test123secret456";
    const NOW: i64 = 1_700_000_000;

    fn header(secret: &str, t: i64, payload: &[u8]) -> String {
        format!("t={},v1={}", t, sign_payload(secret, t, payload))
    }

    #[test]
    fn valid_signature_is_accepted() {
        let verifier = StripeWebhookVerifier::new(SECRET, 300);
        let payload = br#"{"type":"checkout.session.completed"}"#;
        assert!(verifier.verify(payload, &header(SECRET, NOW, payload), NOW).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let verifier = StripeWebhookVerifier::new(SECRET, 300);
        let payload = br#"{"type":"checkout.session.completed"}"#;
        assert!(matches!(
            verifier.verify(payload, &header("wrong", NOW, payload), NOW),
            Err(DomainError::InvalidSignature)
        ));
    }

    #[test]
    fn modified_payload_is_rejected() {
        let verifier = StripeWebhookVerifier::new(SECRET, 300);
        let original = br#"{"type":"checkout.session.completed"}"#;
        let tampered = br#"{"type":"checkout.session.completed","x":1}"#;
        assert!(verifier
            .verify(tampered, &header(SECRET, NOW, original), NOW)
            .is_err());
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let verifier = StripeWebhookVerifier::new(SECRET, 300);
        let payload = b"{}";
        let old = NOW - 600;
        assert!(verifier.verify(payload, &header(SECRET, old, payload), NOW).is_err());
    }

    #[test]
    fn any_matching_v1_is_enough() {
        let verifier = StripeWebhookVerifier::new(SECRET, 300);
        let payload = b"{}";
        let good = sign_payload(SECRET, NOW, payload);
        let value = format!("t={NOW},v1=deadbeef,v0=ignored,v1={good}");
        assert!(verifier.verify(payload, &value, NOW).is_ok());
    }

    #[test]
    fn header_without_timestamp_is_rejected() {
        let verifier = StripeWebhookVerifier::new(SECRET, 300);
        let payload = b"{}";
        let value = format!("v1={}", sign_payload(SECRET, NOW, payload));
        assert!(verifier.verify(payload, &value, NOW).is_err());
    }

    #[test]
    fn missing_header_is_rejected() {
        let verifier = StripeWebhookVerifier::new(SECRET, 300);
        assert!(matches!(
            verifier.decode(b"{}", None),
            Err(DomainError::InvalidSignature)
        ));
    }

    #[test]
    fn checkout_completed_is_decoded() {
        let order_id = Uuid::new_v4();
        let payload = serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_1", "client_reference_id": order_id } }
        })
        .to_string();

        assert_eq!(
            parse_event(payload.as_bytes()),
            PaymentEvent::CheckoutCompleted {
                order_id,
                session_id: "cs_1".to_string()
            }
        );
    }

    #[test]
    fn completion_without_reference_is_malformed() {
        let payload = r#"{"type":"checkout.session.completed","data":{"object":{"id":"cs_1"}}}"#;
        assert!(matches!(
            parse_event(payload.as_bytes()),
            PaymentEvent::Malformed(_)
        ));
    }

    #[test]
    fn other_events_are_passed_through() {
        let payload = r#"{"type":"charge.refunded","data":{"object":{}}}"#;
        assert_eq!(
            parse_event(payload.as_bytes()),
            PaymentEvent::Other("charge.refunded".to_string())
        );
    }

    #[test]
    fn session_form_links_order_and_lists_items() {
        let gateway = StripeCheckoutGateway::new(StripeConfig {
            secret_key: "sk_test".to_string(),
            api_base: "https://api.stripe.test".to_string(),
            success_url: "https://shop.test/success".to_string(),
            cancel_url: "https://shop.test/cancel".to_string(),
        })
        .unwrap();
        let order_id = Uuid::new_v4();
        let request = CheckoutRequest {
            order_id,
            currency: Currency::Eur,
            customer_email: "anna@example.com".to_string(),
            line_items: vec![
                CheckoutLineItem {
                    name: "Lavender".to_string(),
                    unit_amount: 1200,
                    quantity: 2,
                },
                CheckoutLineItem {
                    name: "Home Delivery".to_string(),
                    unit_amount: 600,
                    quantity: 1,
                },
            ],
        };

        let form = gateway.session_form(&request);
        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("client_reference_id"), Some(order_id.to_string().as_str()));
        assert_eq!(get("customer_email"), Some("anna@example.com"));
        assert_eq!(get("line_items[0][price_data][currency]"), Some("eur"));
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("1200"));
        assert_eq!(get("line_items[0][quantity]"), Some("2"));
        assert_eq!(
            get("line_items[1][price_data][product_data][name]"),
            Some("Home Delivery")
        );
    }
}
