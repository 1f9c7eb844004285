//! TwoSevenths poll backend

use twosevenths_api::config::Config;
use twosevenths_api::infrastructure::database::DatabaseConnection;
use twosevenths_api::infrastructure::legacy::import_legacy_data;
use twosevenths_api::infrastructure::traits::{MessageRepository, VoteRepository};
use twosevenths_api::{api, service_collection};

use anyhow::anyhow;
use axum::Router;
use di_axum::RouterServiceProviderExtensions;
use log::{info, warn};
use tokio::runtime::{Builder, Runtime};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;

    let runtime: Runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(web_server_task(config))
}

async fn web_server_task(config: Config) -> anyhow::Result<()> {
    let connection = DatabaseConnection::open(&config.database_url, config.max_connections).await?;
    connection.migrate().await?;

    let provider = service_collection(connection)
        .build_provider()
        .map_err(|e| anyhow!("invalid service registrations: {e:?}"))?;

    info!(
        "checking {} for legacy data",
        config.legacy_data_dir.display()
    );
    let report = import_legacy_data(
        &config.legacy_data_dir,
        &*provider.get_required::<dyn VoteRepository>(),
        &*provider.get_required::<dyn MessageRepository>(),
    )
    .await;
    if report.total() > 0 {
        info!("migrated {} legacy records", report.total());
    }
    if report.failed > 0 {
        warn!("{} legacy records could not be stored", report.failed);
    }

    let app = Router::new()
        .nest("/api", api::router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_provider(provider);

    let listener = tokio::net::TcpListener::bind(config.listen_address()).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {e}");
    }
}
