//! India Victory Path - conversational tournament analyst
//!
//! A Rust backend that drives one conversation with a remote analyst agent
//! through a pure state machine and serves it to a display layer over HTTP.

mod activity;
mod agent;
mod api;
mod config;
mod markdown;
mod normalize;
mod runtime;
mod state_machine;

use activity::ActivityTracker;
use agent::{AgentClient, HttpAgentClient, LoggingClient};
use api::{create_router, AppState};
use config::AppConfig;
use runtime::ConversationRuntime;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "victory_path=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env()?;
    if config.agent_api_key.is_none() {
        tracing::warn!("VICTORY_PATH_AGENT_API_KEY not set, calling the agent without a key");
    }

    // Agent transport
    let http_client = HttpAgentClient::new(
        &config.agent_url,
        config.agent_api_key.clone(),
        config.agent_timeout,
    )?;
    let inner: Arc<dyn AgentClient> = Arc::new(http_client);
    let agent = Arc::new(LoggingClient::new(inner));
    tracing::info!(
        url = %config.agent_url,
        agent_id = %config.agent_id,
        timeout_secs = config.agent_timeout.as_secs(),
        "Agent client initialized"
    );

    // Conversation runtime
    let activity = Arc::new(ActivityTracker::new());
    let (runtime, conversation) =
        ConversationRuntime::new(config.conv_context(), agent, activity.clone());
    tokio::spawn(runtime.run());

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(AppState {
        conversation,
        activity,
    })
    .layer(cors)
    .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Victory path server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
