mod app;
mod auth;
mod config;
mod convert;
mod db;
mod error;
mod extract;
mod state;
mod users;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "turtleconver_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init()?;
    let config = state.config.clone();

    // Schema bootstrap and admin seed run in the background so the listener
    // is available even while the database is unreachable.
    let bg = state.clone();
    tokio::spawn(async move {
        if bg.config.skip_db_init {
            tracing::info!("SKIP_DB_INIT set; skipping schema bootstrap");
        } else if let Err(e) = db::init_schema(&bg.db).await {
            tracing::warn!(error = %format!("{e:#}"), "schema bootstrap failed; requests will fail until the database is reachable");
            return;
        }
        match auth::service::ensure_admin_seed(bg.users.as_ref(), &bg.config.admin_seed).await {
            Ok(Some(admin)) => {
                tracing::info!(user_id = admin.id, username = %admin.username, "admin account ready")
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "admin seed failed"),
        }
    });

    let app = app::build_app(state);
    app::serve(app, &config.host, config.port).await
}
