use actix_web::{web, HttpResponse};

use crate::application::blocking;
use crate::domain::catalog::{Candle, Collection};
use crate::errors::AppError;
use crate::AppState;

/// GET /candles
#[utoipa::path(
    get,
    path = "/candles",
    responses(
        (status = 200, description = "All candles in the catalog", body = [Candle]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_candles(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let candles = blocking(move || catalog.list_candles()).await?;
    Ok(HttpResponse::Ok().json(candles))
}

/// GET /collections
#[utoipa::path(
    get,
    path = "/collections",
    responses(
        (status = 200, description = "All collections", body = [Collection]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_collections(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let collections = blocking(move || catalog.list_collections()).await?;
    Ok(HttpResponse::Ok().json(collections))
}

/// GET /collections/{name}/candles
#[utoipa::path(
    get,
    path = "/collections/{name}/candles",
    params(
        ("name" = String, Path, description = "Collection name"),
    ),
    responses(
        (status = 200, description = "Candles in the collection", body = [Candle]),
        (status = 404, description = "Collection not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn collection_candles(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner();
    let catalog = state.catalog.clone();
    let lookup = name.clone();

    match blocking(move || catalog.collection_candles(&lookup)).await? {
        Some(candles) => Ok(HttpResponse::Ok().json(candles)),
        None => Err(AppError::NotFound(format!("Collection '{name}' not found"))),
    }
}
