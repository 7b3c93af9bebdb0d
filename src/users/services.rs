use tracing::info;

use crate::auth::password::hash_password;
use crate::error::{ApiError, ApiResult};
use crate::users::dto::UpdateUserRequest;
use crate::users::repo::UsersRepo;
use crate::users::repo_types::{NewUser, PublicUser, Role, UserPatch};

const USERNAME_TAKEN: &str = "username already exists";

pub async fn list(repo: &dyn UsersRepo) -> ApiResult<Vec<PublicUser>> {
    repo.list().await
}

pub async fn create(
    repo: &dyn UsersRepo,
    username: String,
    password: String,
    role: Role,
) -> ApiResult<PublicUser> {
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "username and password are required".into(),
        ));
    }
    // Pre-check for a consistent error message; a race still surfaces as the
    // same Conflict via the store's unique constraint (23505 mapping).
    if repo.find_by_username(&username).await?.is_some() {
        return Err(ApiError::Conflict(USERNAME_TAKEN.into()));
    }
    let created = repo
        .create(NewUser {
            username,
            password_hash: hash_password(&password)?,
            role,
        })
        .await?;
    info!(user_id = created.id, username = %created.username, "user created");
    Ok(created)
}

pub async fn update(
    repo: &dyn UsersRepo,
    id: i64,
    req: UpdateUserRequest,
) -> ApiResult<PublicUser> {
    let patch = UserPatch {
        username: req.username,
        password_hash: req.password.as_deref().map(hash_password).transpose()?,
        role: req.role,
    };
    let updated = repo.update(id, patch).await?;
    info!(user_id = id, "user updated");
    Ok(updated)
}

pub async fn remove(repo: &dyn UsersRepo, id: i64) -> ApiResult<()> {
    repo.remove(id).await?;
    info!(user_id = id, "user removed");
    Ok(())
}
