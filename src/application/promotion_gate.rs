use std::sync::Arc;

use uuid::Uuid;

use super::blocking;
use crate::domain::catalog::Promotion;
use crate::domain::errors::DomainError;
use crate::domain::ports::PromotionStore;

#[derive(Debug, Clone, PartialEq)]
pub struct PromotionStatus {
    pub promotion: Promotion,
    /// `false` once this email has redeemed the promotion.
    pub available: bool,
}

#[derive(Clone)]
pub struct PromotionGate {
    store: Arc<dyn PromotionStore>,
}

impl PromotionGate {
    pub fn new(store: Arc<dyn PromotionStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, code: &str, email: &str) -> Result<PromotionStatus, DomainError> {
        let store = self.store.clone();
        let code = code.trim().to_string();
        let email = email.to_string();

        blocking(move || {
            let promotion = store
                .find_by_name(&code)?
                .ok_or(DomainError::PromotionNotFound)?;
            let available = !store.is_redeemed(promotion.id, &email)?;
            Ok(PromotionStatus {
                promotion,
                available,
            })
        })
        .await
    }

    /// Resolves `code` and rejects it when this email already used it.
    pub async fn require_available(
        &self,
        code: &str,
        email: &str,
    ) -> Result<Promotion, DomainError> {
        let status = self.resolve(code, email).await?;
        if !status.available {
            log::info!(
                "Promotion {} already used by {}",
                status.promotion.name,
                email
            );
            return Err(DomainError::PromotionUnavailable);
        }
        Ok(status.promotion)
    }

    /// Records that `email` used the promotion. Returns `false` if it was
    /// already recorded.
    pub async fn record_redemption(
        &self,
        promotion_id: Uuid,
        email: &str,
    ) -> Result<bool, DomainError> {
        let store = self.store.clone();
        let email = email.to_string();
        blocking(move || store.record_redemption(promotion_id, &email)).await
    }
}
