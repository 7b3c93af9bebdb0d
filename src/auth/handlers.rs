use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::auth::dto::{LoginRequest, LoginResponse};
use crate::auth::jwt::JwtKeys;
use crate::auth::service;
use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let response = service::login(state.users.as_ref(), &keys, payload).await?;
    Ok(Json(response))
}
