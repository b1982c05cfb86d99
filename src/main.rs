//! Steadfast - backend for a sobriety support companion
//!
//! "One day at a time"

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use steadfast::{config::Args, db::seed::seed_reference_data, server};

/// Wire up the tracing subscriber.
///
/// RUST_LOG wins when set; otherwise the CLI log level applies to this
/// crate and info to everything else.
fn init_tracing(args: &Args) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("steadfast={},info", args.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if args.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments set the environment directly
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(&args);
    args.validate().context("configuration error")?;

    info!(
        "Steadfast v{} - \"One day at a time\"",
        env!("CARGO_PKG_VERSION")
    );
    info!("MongoDB: {} (db: {})", args.mongodb_uri, args.mongodb_db);
    if args.dev_mode {
        info!("Mode: DEVELOPMENT");
    } else {
        info!("Mode: PRODUCTION");
    }

    // Unreachable storage is fatal; routes assume the collections exist
    let state = Arc::new(server::AppState::init(args).await.context("startup failed")?);

    // Seeding failures only cost the resources endpoints their content
    if let Err(e) = seed_reference_data(&state.helplines, &state.quotes).await {
        warn!("Reference data seeding failed: {}", e);
    }

    let server = tokio::spawn(server::run(Arc::clone(&state)));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        result = server => {
            result.context("server task panicked")??;
        }
    }

    info!("Shutdown complete");
    Ok(())
}
