//! User endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::UserRepo;
use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;
use crate::models::{NewUser, User};

/// Create user request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// User response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_hex(),
            name: u.name,
            email: u.email,
        }
    }
}

/// GET /users - list every user
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = UserRepo::new(state.store.as_ref())
        .list()
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /users - create a user; duplicate emails are rejected with 400
async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = NewUser::new(req.name, req.email)?;
    let user = UserRepo::new(state.store.as_ref())
        .create(user)
        .await
        .map_err(ApiError::bad_request)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users", get(list_users).post(create_user))
}
