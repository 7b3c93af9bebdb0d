use tracing::{info, warn};

use crate::auth::dto::{LoginRequest, LoginResponse, SessionUser};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::config::AdminSeedConfig;
use crate::error::{ApiError, ApiResult};
use crate::users::repo::UsersRepo;
use crate::users::repo_types::{NewUser, PublicUser, Role};

/// Unknown username and wrong password produce this same message, so the API
/// cannot be used to enumerate usernames.
const INVALID_CREDENTIALS: &str = "invalid credentials";

pub async fn login(
    repo: &dyn UsersRepo,
    keys: &JwtKeys,
    req: LoginRequest,
) -> ApiResult<LoginResponse> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "username and password are required".into(),
        ));
    }

    let Some(user) = repo.find_by_username(&req.username).await? else {
        warn!(username = %req.username, "login with unknown username");
        return Err(ApiError::Authentication(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = user.id, "login with invalid password");
        return Err(ApiError::Authentication(INVALID_CREDENTIALS.into()));
    }

    let token = keys.sign(&user)?;
    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(LoginResponse {
        ok: true,
        token,
        user: SessionUser::from(&user),
    })
}

/// Creates the bootstrap admin account when it does not exist yet. Returns
/// `None` when seeding is disabled (no password configured) and the account
/// is absent. Safe to call any number of times.
pub async fn ensure_admin_seed(
    repo: &dyn UsersRepo,
    seed: &AdminSeedConfig,
) -> ApiResult<Option<PublicUser>> {
    if let Some(existing) = repo.find_by_username(&seed.username).await? {
        return Ok(Some(existing.into()));
    }

    let Some(password) = seed.password.as_deref() else {
        warn!(
            username = %seed.username,
            "ADMIN_PASSWORD not set; skipping admin seed"
        );
        return Ok(None);
    };

    let created = repo
        .create(NewUser {
            username: seed.username.clone(),
            password_hash: hash_password(password)?,
            role: Role::Admin,
        })
        .await?;
    info!(user_id = created.id, username = %created.username, "admin account seeded");
    Ok(Some(created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::mem::MemUsers;
    use time::Duration;

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret", Duration::minutes(120))
    }

    fn seed_cfg(password: Option<&str>) -> AdminSeedConfig {
        AdminSeedConfig {
            username: "admin".into(),
            password: password.map(Into::into),
        }
    }

    async fn seeded_repo() -> MemUsers {
        let repo = MemUsers::default();
        ensure_admin_seed(&repo, &seed_cfg(Some("1234abcd")))
            .await
            .expect("seed")
            .expect("created");
        repo
    }

    #[tokio::test]
    async fn seed_creates_admin_once() {
        let repo = MemUsers::default();
        let first = ensure_admin_seed(&repo, &seed_cfg(Some("1234abcd")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.username, "admin");
        assert_eq!(first.role, Role::Admin);

        let second = ensure_admin_seed(&repo, &seed_cfg(Some("other-pass")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn seed_is_disabled_without_password() {
        let repo = MemUsers::default();
        let seeded = ensure_admin_seed(&repo, &seed_cfg(None)).await.unwrap();
        assert!(seeded.is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn login_returns_claims_matching_stored_record() {
        let repo = seeded_repo().await;
        let keys = keys();
        let res = login(
            &repo,
            &keys,
            LoginRequest {
                username: "admin".into(),
                password: "1234abcd".into(),
            },
        )
        .await
        .expect("login");

        let claims = keys.verify(&res.token).expect("verify");
        let stored = repo.find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(claims.sub, stored.id);
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 2 * 60 * 60);
        assert_eq!(res.user.id, stored.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_yield_identical_message() {
        let repo = seeded_repo().await;
        let keys = keys();

        let wrong_password = login(
            &repo,
            &keys,
            LoginRequest {
                username: "admin".into(),
                password: "nope".into(),
            },
        )
        .await
        .unwrap_err();

        let unknown_user = login(
            &repo,
            &keys,
            LoginRequest {
                username: "ghost".into(),
                password: "nope".into(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, ApiError::Authentication(_)));
        assert!(matches!(unknown_user, ApiError::Authentication(_)));
    }

    #[tokio::test]
    async fn empty_fields_are_a_validation_error() {
        let repo = MemUsers::default();
        let err = login(
            &repo,
            &keys(),
            LoginRequest {
                username: "".into(),
                password: "".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
