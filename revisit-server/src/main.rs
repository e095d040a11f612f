//! revisit-server - remembered-name store for the re-identification demo
//!
//! Serves the lookup/store/delete/enrich API the client state machine is
//! built against. Names are keyed by strong fingerprint with the soft
//! fingerprint as a lossy fallback key.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use revisit_server::{build_router, db, enrichment::EnrichmentClient, AppState};

/// Command-line arguments for revisit-server
#[derive(Parser, Debug)]
#[command(name = "revisit-server")]
#[command(about = "Remembered-name store for the revisit demo")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "REVISIT_PORT")]
    port: u16,

    /// Path to the visitor database
    #[arg(short, long, default_value = "revisit.db", env = "REVISIT_DB")]
    database: PathBuf,

    /// Base URL of the external IP-enrichment service
    #[arg(long, env = "REVISIT_ENRICH_URL")]
    enrich_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting revisit-server v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let pool = db::connect(&args.database).await?;
    info!("Visitor database: {}", args.database.display());

    let enrichment = EnrichmentClient::new(args.enrich_url)?;

    let state = AppState::new(pool, enrichment);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("revisit-server listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
