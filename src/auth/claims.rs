use serde::{Deserialize, Serialize};

use crate::users::repo_types::Role;

/// JWT payload: the authenticated identity plus issue/expiry timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,         // user id
    pub username: String,
    pub role: Role,
    pub iat: usize,       // issued at (unix timestamp)
    pub exp: usize,       // expires at (unix timestamp)
}
