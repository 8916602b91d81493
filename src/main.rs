mod config;
mod db;
mod rate_limit;
mod routes;
mod services;
mod state;
mod validate;

use std::sync::Arc;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tracing_subscriber::{EnvFilter, fmt};

use crate::services::mailer::{Mailer, ResendMailer};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")))
        .init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    let port = config.port;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    match services::session::purge_expired(&pool).await {
        Ok(purged) => tracing::info!(purged, "expired sessions purged"),
        Err(e) => tracing::warn!(error = %e, "session purge failed"),
    }

    if let Some(admin) = &config.bootstrap_admin {
        let admin_id = services::auth::upsert_admin(&pool, &admin.email, &admin.password)
            .await
            .expect("admin bootstrap failed");
        tracing::info!(%admin_id, email = %admin.email, "bootstrap admin ready");
    }

    let mailer: Option<Arc<dyn Mailer>> = match &config.email {
        Some(email) => Some(Arc::new(ResendMailer::new(email))),
        None => {
            tracing::warn!("RESEND_API_KEY/RESEND_FROM not set; email features disabled");
            None
        }
    };

    let state = state::AppState::new(pool, config, mailer);
    state
        .storage
        .ensure_buckets()
        .await
        .expect("failed to create upload buckets");

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "dentfolio listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
    tracing::info!("server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
