mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use ranktrack_dataforseo::DataForSeoClient;
use ranktrack_geocode::GeocodeClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(ranktrack_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, addr = %config.bind_addr, "ranktrack starting up");
    tracing::info!(url = config.dataforseo_base_url(), "DataForSEO endpoint selected");

    let geocode = Arc::new(GeocodeClient::from_config(&config)?);
    let dataforseo = Arc::new(DataForSeoClient::new(
        config.dataforseo_base_url(),
        &config.dataforseo_login,
        &config.dataforseo_password,
        config.request_timeout_secs,
        config.max_depth,
        &config.user_agent,
    )?);

    let app = build_app(AppState {
        config: Arc::clone(&config),
        geocode,
        dataforseo,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
