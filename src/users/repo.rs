use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::{ApiError, ApiResult};
use crate::users::repo_types::{NewUser, PublicUser, User, UserPatch};

/// Persistence contract for the users table. No business rules live here;
/// services are tested against the in-memory implementation below.
#[async_trait]
pub trait UsersRepo: Send + Sync {
    /// Exact-match lookup returning the full row, password hash included.
    /// Only the login path may call this.
    async fn find_by_username(&self, username: &str) -> ApiResult<Option<User>>;

    async fn find_by_id(&self, id: i64) -> ApiResult<Option<PublicUser>>;

    /// All users, newest first.
    async fn list(&self) -> ApiResult<Vec<PublicUser>>;

    async fn create(&self, user: NewUser) -> ApiResult<PublicUser>;

    /// Writes only the fields present in the patch. An empty patch reads the
    /// current row back unchanged.
    async fn update(&self, id: i64, patch: UserPatch) -> ApiResult<PublicUser>;

    /// Idempotent: deleting an absent id is not an error.
    async fn remove(&self, id: i64) -> ApiResult<()>;
}

pub struct PgUsers {
    db: PgPool,
}

impl PgUsers {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsersRepo for PgUsers {
    async fn find_by_username(&self, username: &str) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> ApiResult<Option<PublicUser>> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, username, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn list(&self) -> ApiResult<Vec<PublicUser>> {
        let rows = sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, username, role, created_at
            FROM users
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn create(&self, user: NewUser) -> ApiResult<PublicUser> {
        let created = sqlx::query_as::<_, PublicUser>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, role, created_at
            "#,
        )
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.role)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> ApiResult<PublicUser> {
        if patch.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| ApiError::NotFound("user not found".into()));
        }

        // Only provided columns are written; every value is bound.
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut set = qb.separated(", ");
        if let Some(username) = patch.username {
            set.push("username = ").push_bind_unseparated(username);
        }
        if let Some(hash) = patch.password_hash {
            set.push("password_hash = ").push_bind_unseparated(hash);
        }
        if let Some(role) = patch.role {
            set.push("role = ").push_bind_unseparated(role);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id, username, role, created_at");

        qb.build_query_as::<PublicUser>()
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".into()))
    }

    async fn remove(&self, id: i64) -> ApiResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod mem {
    use std::sync::Mutex;

    use super::*;
    use time::OffsetDateTime;

    /// In-memory repository with the same contract as `PgUsers`, used to test
    /// services and handlers without a database.
    #[derive(Default)]
    pub(crate) struct MemUsers {
        inner: Mutex<MemState>,
    }

    #[derive(Default)]
    struct MemState {
        next_id: i64,
        rows: Vec<User>,
    }

    #[async_trait]
    impl UsersRepo for MemUsers {
        async fn find_by_username(&self, username: &str) -> ApiResult<Option<User>> {
            let state = self.inner.lock().unwrap();
            Ok(state.rows.iter().find(|u| u.username == username).cloned())
        }

        async fn find_by_id(&self, id: i64) -> ApiResult<Option<PublicUser>> {
            let state = self.inner.lock().unwrap();
            Ok(state
                .rows
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .map(PublicUser::from))
        }

        async fn list(&self) -> ApiResult<Vec<PublicUser>> {
            let state = self.inner.lock().unwrap();
            let mut rows: Vec<PublicUser> =
                state.rows.iter().cloned().map(PublicUser::from).collect();
            rows.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(rows)
        }

        async fn create(&self, user: NewUser) -> ApiResult<PublicUser> {
            let mut state = self.inner.lock().unwrap();
            if state.rows.iter().any(|u| u.username == user.username) {
                return Err(ApiError::Conflict("username already exists".into()));
            }
            state.next_id += 1;
            let row = User {
                id: state.next_id,
                username: user.username,
                password_hash: user.password_hash,
                role: user.role,
                created_at: OffsetDateTime::now_utc(),
            };
            state.rows.push(row.clone());
            Ok(row.into())
        }

        async fn update(&self, id: i64, patch: UserPatch) -> ApiResult<PublicUser> {
            let mut state = self.inner.lock().unwrap();
            let idx = state
                .rows
                .iter()
                .position(|u| u.id == id)
                .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
            // Mirror the store's unique constraint on renames.
            if let Some(username) = &patch.username {
                if state.rows.iter().any(|u| u.username == *username && u.id != id) {
                    return Err(ApiError::Conflict("username already exists".into()));
                }
            }
            let row = &mut state.rows[idx];
            if let Some(username) = patch.username {
                row.username = username;
            }
            if let Some(hash) = patch.password_hash {
                row.password_hash = hash;
            }
            if let Some(role) = patch.role {
                row.role = role;
            }
            Ok(row.clone().into())
        }

        async fn remove(&self, id: i64) -> ApiResult<()> {
            let mut state = self.inner.lock().unwrap();
            state.rows.retain(|u| u.id != id);
            Ok(())
        }
    }
}
