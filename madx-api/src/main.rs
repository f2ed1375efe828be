//! madx-api - advertising platform orchestration service
//!
//! Serves the campaign tree, provisioning endpoints and recommendations to
//! the dashboard, and keeps a local SQLite mirror refreshed in the
//! background.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use madx_api::config::ServiceConfig;
use madx_api::graph::GraphHandle;
use madx_api::services::{spawn_refresh_loop, OpenAiClient};
use madx_api::AppState;
use madx_common::config::{database_path, load_or_default, resolve_root_folder, ENV_ROOT_FOLDER};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "madx-api")]
#[command(about = "Advertising platform orchestration service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "MADX_PORT")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "MADX_HOST")]
    host: String,

    /// Path to madx.toml
    #[arg(short, long, env = "MADX_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the mirror database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Do not start the background mirror refresher
    #[arg(long)]
    no_refresher: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let toml = load_or_default(args.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting madx-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ENV_ROOT_FOLDER, &toml);
    let db_path = database_path(&root_folder, &toml);
    info!("Root folder: {}", root_folder.display());
    info!("Database: {}", db_path.display());

    let db_pool = madx_common::db::init_database(&db_path).await?;

    let config = ServiceConfig::resolve(&toml);
    let graph = GraphHandle::connect(&config.graph);

    let mut state = AppState::new(db_pool, graph)
        .with_traversal(config.traversal)
        .with_refresh(config.refresh)
        .with_page_id(config.graph.page_id.clone());

    match OpenAiClient::new(&config.advisor) {
        Ok(client) => {
            info!(model = %config.advisor.model, "Advisor configured");
            state = state.with_advisor(Arc::new(client));
        }
        Err(e) => warn!(error = %e, "Advisor disabled; /recommend will report 503"),
    }

    let cancel = CancellationToken::new();
    let refresher = if config.refresh.enabled && !args.no_refresher {
        Some(spawn_refresh_loop(state.clone(), config.refresh, cancel.clone()))
    } else {
        info!("Mirror refresher disabled");
        None
    };

    let app = madx_api::build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown requested");
            shutdown.cancel();
        })
        .await?;

    cancel.cancel();
    if let Some(handle) = refresher {
        if let Err(e) = handle.await {
            warn!(error = %e, "Refresher task ended abnormally");
        }
    }

    info!("madx-api stopped");
    Ok(())
}
