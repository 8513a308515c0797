//! HTTP API for the quiz service (axum + JSON).
//!
//! Thin transport layer: handlers decode JSON bodies, call into
//! `quiz-services`, and encode camelCase responses. No domain logic lives
//! here.
//!
//! **Public API**: [`serve`], [`serve_on_listener`], [`router`], [`AppState`].

mod error;
mod handlers;

pub use error::ApiError;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use quiz_services::AppServices;

/// Shared handler state: the service layer, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    services: AppServices,
}

impl AppState {
    pub fn new(services: AppServices) -> Self {
        Self { services }
    }
}

/// Builds the full route table over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/questions/generate", post(handlers::quiz::generate))
        .route("/api/answers/submit", post(handlers::quiz::submit))
        .route(
            "/api/documents",
            get(handlers::documents::list).post(handlers::documents::upload),
        )
        .route("/api/teacher/students", get(handlers::students::list))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on an existing listener. Used by tests (bind to
/// 127.0.0.1:0 then pass the listener in).
pub async fn serve_on_listener(
    listener: TcpListener,
    services: AppServices,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("quiz API listening on http://{addr}");
    let app = router(AppState::new(services));
    axum::serve(listener, app).await?;
    Ok(())
}

/// Binds `addr` and serves the API until the process is stopped.
pub async fn serve(
    addr: &str,
    services: AppServices,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    serve_on_listener(listener, services).await
}
