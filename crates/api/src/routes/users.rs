//! User registration and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::UserId;
use domain::{Password, Store, User, UserRole};
use serde::{Deserialize, Serialize};

use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub id: Option<UserId>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub cellphone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub user_type: UserRole,
}

/// A user as returned to clients; the password never leaves the server.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Option<UserId>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub cellphone: String,
    pub user_type: UserRole,
    pub date_created: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
}

impl From<UserRequest> for User {
    fn from(req: UserRequest) -> Self {
        User {
            id: req.id,
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            address: req.address,
            cellphone: req.cellphone,
            password: Password::new(req.password),
            role: req.user_type,
            ..User::default()
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            address: user.address,
            cellphone: user.cellphone,
            user_type: user.role,
            date_created: user.date_created,
            date_updated: user.date_updated,
        }
    }
}

/// POST /api/v1/users: Register or update a user.
#[tracing::instrument(skip(state, req), fields(user_id = ?req.id, email = %req.email))]
pub async fn save<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.users.save(req.into()).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/{id}
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.find_by_id(parse_id(&id)?).await?;
    Ok(Json(user.into()))
}
