pub mod catalog_repo;
pub mod mailer;
pub mod models;
pub mod order_repo;
pub mod promotion_repo;
pub mod stripe;

use crate::domain::catalog::{Candle, Collection, Promotion};
use crate::domain::errors::DomainError;

use models::{CandleRow, CollectionRow, PromotionRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

// ── Row mapping ──────────────────────────────────────────────────────────────

impl From<CandleRow> for Candle {
    fn from(r: CandleRow) -> Self {
        Candle {
            id: r.id,
            name_hu: r.name_hu,
            name_en: r.name_en,
            description_hu: r.description_hu,
            description_en: r.description_en,
            description_cz: r.description_cz,
            image_url: r.image_url,
            price_huf: r.price_huf,
            price_eur: r.price_eur,
            price_czk: r.price_czk,
        }
    }
}

impl From<CollectionRow> for Collection {
    fn from(r: CollectionRow) -> Self {
        Collection {
            name: r.name,
            description: r.description,
        }
    }
}

impl From<PromotionRow> for Promotion {
    fn from(r: PromotionRow) -> Self {
        Promotion {
            id: r.id,
            name: r.name,
            percentage: r.percentage,
        }
    }
}
