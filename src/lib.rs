pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod state;
pub mod validate;

use axum::http::header;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assembles the application router with its middleware. Shared between
/// `main` and the integration tests so the tested router is the served one.
pub fn app(state: AppState) -> Router {
    // Browser clients read the suggested filename off the response, so
    // Content-Disposition must be CORS-exposed explicitly.
    let cors = CorsLayer::permissive().expose_headers([header::CONTENT_DISPOSITION]);

    Router::new()
        // Liveness
        .route("/", get(handlers::root))
        // YouTube routes
        .route("/api/info", post(handlers::youtube::info))
        .route(
            "/api/download/video",
            post(handlers::youtube::download_video),
        )
        .route(
            "/api/download/audio",
            post(handlers::youtube::download_audio),
        )
        // Instagram routes
        .route("/api/instagram/info", post(handlers::instagram::info))
        .route(
            "/api/instagram/download",
            post(handlers::instagram::download),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
