mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use crate::scheduler::EnrichmentScheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = punchmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = punchmap_db::PoolConfig::from_app_config(&config);
    let pool = punchmap_db::connect_pool(&config.database_url, pool_config).await?;
    punchmap_db::run_migrations(&pool).await?;

    let provider = Arc::new(punchmap_overpass::OverpassClient::with_base_url(
        config.overpass_timeout_secs,
        &config.overpass_base_url,
    )?);
    let geocoder = punchmap_geocode::GeocodeClient::with_base_url(
        &config.geocoder_user_agent,
        config.geocoder_timeout_secs,
        &config.geocoder_base_url,
    )?;

    let mut enrichment = EnrichmentScheduler::new(pool.clone(), geocoder, &config);
    enrichment.start();

    let app = build_app(AppState {
        pool,
        provider,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    enrichment.stop().await;
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
