#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

/// Bootstrap admin account. Seeding is skipped entirely when no password is
/// configured, so a deployment never ships a predictable credential.
#[derive(Debug, Clone)]
pub struct AdminSeedConfig {
    pub username: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub skip_db_init: bool,
    pub admin_seed: AdminSeedConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(120),
        };
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);
        let skip_db_init = std::env::var("SKIP_DB_INIT")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let admin_seed = AdminSeedConfig {
            username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            password: std::env::var("ADMIN_PASSWORD").ok(),
        };
        Ok(Self {
            database_url,
            jwt,
            host,
            port,
            skip_db_init,
            admin_seed,
        })
    }
}
