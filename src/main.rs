//! Gameweek Roster Backend
//!
//! REST backend that scores fantasy players from a live feed and keeps each user's weekly
//! roster and budget in a key-value store.

mod api;
mod auth;
mod config;
mod db;
mod engine;
mod errors;
mod feed;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::StateStore;
use engine::RosterEngine;
use feed::{FeedClient, PlayerFeed};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StateStore>,
    pub feed: Arc<dyn PlayerFeed>,
    pub engine: RosterEngine,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gameweek Roster Backend");
    tracing::info!("Feed URL: {}", config.feed_url);
    tracing::info!("Allowed users: {:?}", config.allowed_user_ids);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (ROSTER_API_PSK). Authentication is disabled!");
    }

    let store = db::open_store(&config.store_url).await?;
    tracing::info!("State store backend: {}", store.backend_name());

    let feed = Arc::new(FeedClient::new(&config.feed_url, config.feed_timeout)?);

    let state = AppState {
        store,
        feed,
        engine: RosterEngine::new(config.starting_budget),
        config: Arc::new(config.clone()),
    };
    tracing::info!("Starting budget: {}", state.engine.starting_budget());

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        .route("/score", get(api::get_score))
        .route("/roster", get(api::get_roster))
        .route("/roster", post(api::update_roster))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
