//! Product administration endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{CategoryId, ProductId, UserId};
use domain::{Money, Product, Store};
use serde::{Deserialize, Serialize};

use super::{AppState, parse_id};
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub id: Option<ProductId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url_image: String,
    #[serde(default)]
    pub price_cents: i64,
    pub user_id: Option<UserId>,
    pub category_id: Option<CategoryId>,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Option<ProductId>,
    pub name: String,
    pub code: String,
    pub description: String,
    pub url_image: String,
    pub price_cents: i64,
    pub date_created: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
    pub user_id: Option<UserId>,
    pub category_id: Option<CategoryId>,
}

impl From<ProductRequest> for Product {
    fn from(req: ProductRequest) -> Self {
        Product {
            id: req.id,
            name: req.name,
            code: req.code,
            description: req.description,
            url_image: req.url_image,
            price: Money::from_cents(req.price_cents),
            user_id: req.user_id,
            category_id: req.category_id,
            ..Product::default()
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            code: product.code,
            description: product.description,
            url_image: product.url_image,
            price_cents: product.price.cents(),
            date_created: product.date_created,
            date_updated: product.date_updated,
            user_id: product.user_id,
            category_id: product.category_id,
        }
    }
}

// -- Handlers --

/// POST /api/v1/admin/products: Create or update a product.
#[tracing::instrument(skip(state, req), fields(product_id = ?req.id, code = %req.code))]
pub async fn save<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state.products.save(req.into()).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /api/v1/admin/products: List every product.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.products.find_all().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/admin/products/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.products.find_by_id(parse_id(&id)?).await?;
    Ok(Json(product.into()))
}

/// DELETE /api/v1/admin/products/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.products.delete_by_id(parse_id(&id)?).await?;
    Ok(StatusCode::OK)
}
