//! Order placement, lookup and state endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{LineItemId, OrderId, ProductId, UserId};
use domain::{Money, Order, OrderLineItem, OrderState, Store};
use serde::{Deserialize, Serialize};

use super::{AppState, parse_id};
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub id: Option<OrderId>,
    pub order_state: Option<OrderState>,
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub order_products: Vec<LineItemRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub id: Option<LineItemId>,
    pub quantity: u32,
    pub price_cents: i64,
    pub product_id: ProductId,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStateParams {
    pub id: String,
    pub state: String,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Option<OrderId>,
    pub date_created: Option<DateTime<Utc>>,
    pub order_state: OrderState,
    pub user_id: Option<UserId>,
    pub order_products: Vec<LineItemResponse>,
    pub total_order_price_cents: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemResponse {
    pub id: Option<LineItemId>,
    pub quantity: u32,
    pub price_cents: i64,
    pub product_id: ProductId,
    pub total_item_cents: i64,
}

impl From<LineItemRequest> for OrderLineItem {
    fn from(req: LineItemRequest) -> Self {
        OrderLineItem {
            id: req.id,
            quantity: req.quantity,
            price: Money::from_cents(req.price_cents),
            product_id: req.product_id,
        }
    }
}

impl From<&OrderLineItem> for LineItemResponse {
    fn from(item: &OrderLineItem) -> Self {
        Self {
            id: item.id,
            quantity: item.quantity,
            price_cents: item.price.cents(),
            product_id: item.product_id,
            total_item_cents: item.total().cents(),
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            date_created: order.date_created,
            order_state: order.state,
            user_id: order.user_id,
            order_products: order.line_items.iter().map(Into::into).collect(),
            total_order_price_cents: order.total().cents(),
        }
    }
}

// -- Handlers --

/// POST /api/v1/orders: Place an order.
///
/// Whatever state the client asks for, a new order is `CONFIRMED` unless
/// it explicitly asked for `CANCELLED`.
#[tracing::instrument(skip(state, req), fields(order_id = ?req.id, user_id = ?req.user_id))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<OrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = Order {
        id: req.id,
        date_created: None,
        state: OrderState::for_new_order(req.order_state),
        user_id: req.user_id,
        line_items: req.order_products.into_iter().map(Into::into).collect(),
    };

    let saved = state.orders.save(order).await?;
    Ok(Json(saved.into()))
}

/// POST /api/v1/orders/update/state/order?id=&state=: Overwrite an order's state.
#[tracing::instrument(skip(state))]
pub async fn update_state<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<UpdateStateParams>,
) -> Result<StatusCode, ApiError> {
    state
        .orders
        .update_state_by_id(parse_id(&params.id)?, &params.state)
        .await?;
    Ok(StatusCode::OK)
}

/// GET /api/v1/orders: List every order.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.orders.find_all().await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.find_by_id(parse_id(&id)?).await?;
    Ok(Json(order.into()))
}

/// GET /api/v1/orders/by-user/{id}: List the orders placed by one user.
#[tracing::instrument(skip(state))]
pub async fn by_user<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.orders.find_by_user_id(parse_id(&id)?).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}
