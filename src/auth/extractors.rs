use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::claims::Claims;
use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;
use crate::users::repo_types::Role;

/// Authentication gate: extracts the bearer token, verifies it and exposes
/// the claim set to the handler.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Authentication("missing bearer token".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Authentication("invalid authorization header".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Authentication("invalid or expired token".into())
        })?;

        Ok(AuthUser(claims))
    }
}

/// Authorization gate for admin-only routes: authenticates first, then
/// requires the admin role.
pub struct RequireAdmin(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if claims.role != Role::Admin {
            warn!(user_id = claims.sub, "admin route denied");
            return Err(ApiError::Authorization("admin role required".into()));
        }
        Ok(RequireAdmin(claims))
    }
}
