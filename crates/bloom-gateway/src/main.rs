//! Bloom Gateway — patient-feedback classification and LLM action reports over HTTP.
//! Permissive CORS; the completion model (mock or live) is picked from config at startup.

mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use bloom_core::{model_from_config, CompletionModel, GatewayConfig};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub struct AppState {
    pub model: Arc<dyn CompletionModel>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::load()?;
    let addr = config.bind_addr()?;

    let state = Arc::new(AppState {
        model: model_from_config(&config),
    });

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[BLOOM] Gateway v{} listening on {}", bloom_core::version(), addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the gateway router with CORS and request logging.
fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/process_feedback", post(handlers::process_feedback))
        .route("/generate_report", post(handlers::generate_report))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_feedback_traffic))
        .layer(CorsLayer::permissive())
}

async fn log_feedback_traffic(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        "[BLOOM] {} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
