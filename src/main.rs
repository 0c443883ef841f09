use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing::info;

use trade_calendar::api;
use trade_calendar::types::AppState;
use trade_calendar::TradeStore;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Host address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to run the web server on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Directory CSV sources are read from (also sandboxes csvPath requests)
    #[arg(short, long, env = "DATA_DIR", default_value = "data")]
    data_dir: String,

    /// Directory with the static frontend
    #[arg(long, env = "FRONTEND_DIR", default_value = "frontend")]
    frontend_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trade_calendar=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    info!("Starting trade calendar server");
    info!("Data directory: {}", args.data_dir);

    let state = Arc::new(AppState {
        store: TradeStore::new(&args.data_dir),
    });

    // Build router
    let app = Router::new()
        .route("/api/calendar", get(api::get_calendar))
        .route("/api/calendar/upload", post(api::upload_calendar))
        .nest_service("/", ServeDir::new(&args.frontend_dir))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state);

    let addr = SocketAddr::from((args.host, args.port));
    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
