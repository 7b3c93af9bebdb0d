use anyhow::Context;
use sqlx::PgPool;

const CREATE_ROLE_TYPE: &str = r#"
DO $$ BEGIN
    CREATE TYPE user_role AS ENUM ('admin', 'user');
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$
"#;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            BIGSERIAL PRIMARY KEY,
    username      VARCHAR(100) NOT NULL UNIQUE,
    password_hash VARCHAR(200) NOT NULL,
    role          user_role    NOT NULL DEFAULT 'user',
    created_at    TIMESTAMPTZ  NOT NULL DEFAULT now()
)
"#;

/// Creates the role enum and users table if absent. Runs in the background at
/// startup; when it fails, routes keep failing per request until the store is
/// reachable.
pub async fn init_schema(db: &PgPool) -> anyhow::Result<()> {
    sqlx::query(CREATE_ROLE_TYPE)
        .execute(db)
        .await
        .context("create user_role type")?;
    sqlx::query(CREATE_USERS_TABLE)
        .execute(db)
        .await
        .context("create users table")?;
    Ok(())
}
