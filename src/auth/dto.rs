use serde::{Deserialize, Serialize};

use crate::users::repo_types::{Role, User};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Identity echoed back to the client; mirrors the token's claim set.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            role: u.role,
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
    pub token: String,
    pub user: SessionUser,
}
