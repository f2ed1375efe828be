//! madx-ingest - one-shot campaign tree fetch
//!
//! Prints the tree as JSON on stdout and optionally stores it in the mirror.
//! Logs go to stderr so the output can be piped.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use madx_api::config::ServiceConfig;
use madx_api::db::store_tree;
use madx_api::graph::GraphHandle;
use madx_api::services::fetch_campaign_tree;
use madx_common::config::{database_path, load_or_default, resolve_root_folder, ENV_ROOT_FOLDER};

#[derive(Parser, Debug)]
#[command(name = "madx-ingest")]
#[command(about = "Fetch the campaign tree once and print it as JSON")]
#[command(version)]
struct Args {
    /// Enrich campaigns with spend and purchase ROAS
    #[arg(long)]
    insights: bool,

    /// Also store the tree in the local mirror
    #[arg(long)]
    store: bool,

    /// Path to madx.toml
    #[arg(short, long, env = "MADX_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the mirror database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,
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
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ServiceConfig::resolve(&toml);
    let graph = GraphHandle::connect(&config.graph);

    let tree = fetch_campaign_tree(&graph, config.traversal, args.insights)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.to_json()))?;

    println!("{}", serde_json::to_string_pretty(&tree)?);

    if args.store {
        let root_folder = resolve_root_folder(args.root_folder.as_deref(), ENV_ROOT_FOLDER, &toml);
        let db_path = database_path(&root_folder, &toml);
        let pool = madx_common::db::init_database(&db_path)
            .await
            .with_context(|| format!("Failed to open mirror database {}", db_path.display()))?;
        let stats = store_tree(&pool, &tree).await?;
        info!(
            campaigns = stats.campaigns,
            adsets = stats.adsets,
            ads = stats.ads,
            "Stored in {}",
            db_path.display()
        );
    }

    Ok(())
}
