//! inkcoach API Server
//!
//! Backend for a guided creative-writing practice app. Provides REST API
//! endpoints for:
//!
//! - Writing analysis (categorized feedback records)
//! - Streaming coach chat
//! - Free-writing topic generation
//! - Photo description (upload + vision analysis + per-region tips)
//!
//! ## Architecture
//!
//! The server is a thin proxy between the writing frontend and three
//! external providers (generation, vision, storage), adding:
//!
//! - Rate limiting via tower-governor
//! - Structured-output schema enforcement
//! - Request validation and uniform error responses

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod config;
mod error;
mod llm;
mod state;
mod storage;
mod vision;

use api::{
    handle_analyze_writing, handle_describe_image, handle_health, handle_topic,
    handle_writing_chat,
};
use config::Config;
use state::AppState;

/// Command-line arguments for the inkcoach server
#[derive(Parser, Debug)]
#[command(name = "inkcoach-server")]
#[command(about = "inkcoach backend for guided writing practice")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting inkcoach server on {}:{}", args.host, args.port);

    let config = Config::from_env()?;
    let state = AppState::from_config(config);

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .expect("Failed to create rate limiter config"),
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(handle_health))
        // API endpoints
        .route("/api/analyze-writing", post(handle_analyze_writing))
        .route("/api/writing-chat", post(handle_writing_chat))
        .route("/api/topic", post(handle_topic))
        .route("/api/describe-image", post(handle_describe_image))
        // Apply middleware
        .layer(GovernorLayer {
            config: governor_conf,
        })
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);

    axum::serve(listener, app).await?;

    Ok(())
}
