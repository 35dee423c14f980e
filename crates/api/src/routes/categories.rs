//! Category administration endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::CategoryId;
use domain::{Category, Store};
use serde::{Deserialize, Serialize};

use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub id: Option<CategoryId>,
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Option<CategoryId>,
    pub name: String,
    pub date_created: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
}

impl From<CategoryRequest> for Category {
    fn from(req: CategoryRequest) -> Self {
        Category {
            id: req.id,
            name: req.name,
            ..Category::default()
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            date_created: category.date_created,
            date_updated: category.date_updated,
        }
    }
}

/// POST /api/v1/admin/categories: Create or update a category.
#[tracing::instrument(skip(state, req), fields(category_id = ?req.id))]
pub async fn save<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let category = state.categories.save(req.into()).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

/// GET /api/v1/admin/categories: List every category.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state.categories.find_all().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/admin/categories/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = state.categories.find_by_id(parse_id(&id)?).await?;
    Ok(Json(category.into()))
}

/// DELETE /api/v1/admin/categories/{id}
#[tracing::instrument(skip(state))]
pub async fn delete<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.categories.delete_by_id(parse_id(&id)?).await?;
    Ok(StatusCode::OK)
}
