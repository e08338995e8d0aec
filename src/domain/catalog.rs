use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A catalog entry as the storefront sells it. Prices are stored as the
/// catalog keeps them (floating, whole currency units).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Candle {
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

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Collection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Promotion {
    pub id: Uuid,
    pub name: String,
    pub percentage: i32,
}
