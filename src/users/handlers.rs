use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use crate::auth::extractors::{AuthUser, RequireAdmin};
use crate::error::ApiError;
use crate::extract::{PathId, ValidJson};
use crate::state::AppState;
use crate::users::dto::{Ack, CreateUserRequest, Envelope, UpdateUserRequest};
use crate::users::repo_types::PublicUser;
use crate::users::services;

const MIN_FIELD_LEN: usize = 3;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
}

#[instrument(skip_all)]
async fn list_users(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<Envelope<Vec<PublicUser>>>, ApiError> {
    let users = services::list(state.users.as_ref()).await?;
    Ok(Json(Envelope::new(users)))
}

#[instrument(skip_all)]
async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
    ValidJson(payload): ValidJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<Envelope<PublicUser>>), ApiError> {
    if payload.username.len() < MIN_FIELD_LEN || payload.password.len() < MIN_FIELD_LEN {
        return Err(ApiError::Validation(
            "username and password must be at least 3 characters".into(),
        ));
    }
    let created = services::create(
        state.users.as_ref(),
        payload.username,
        payload.password,
        payload.role,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(created))))
}

#[instrument(skip_all)]
async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
    PathId(id): PathId,
    ValidJson(payload): ValidJson<UpdateUserRequest>,
) -> Result<Json<Envelope<PublicUser>>, ApiError> {
    let too_short = |field: &Option<String>| {
        field.as_deref().is_some_and(|v| v.len() < MIN_FIELD_LEN)
    };
    if too_short(&payload.username) || too_short(&payload.password) {
        return Err(ApiError::Validation(
            "username and password must be at least 3 characters".into(),
        ));
    }
    let updated = services::update(state.users.as_ref(), id, payload).await?;
    Ok(Json(Envelope::new(updated)))
}

#[instrument(skip_all)]
async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
    PathId(id): PathId,
) -> Result<Json<Ack>, ApiError> {
    services::remove(state.users.as_ref(), id).await?;
    Ok(Json(Ack::ok()))
}
