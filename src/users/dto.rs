use serde::{Deserialize, Serialize};

use crate::users::repo_types::Role;

/// Request body for creating a user. Role defaults to `user`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Partial update body: omitted fields stay untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Standard success envelope for data-carrying responses.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub ok: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

/// Bare success envelope, used by delete.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
