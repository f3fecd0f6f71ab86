//! API Routes
//!
//! Configures the Axum router for the lookup endpoint.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{api_handler, AppState};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /api?url=<share-link>` - Resolve file name and size
///
/// # Middleware
/// - CORS: Allows any origin so browser front-ends can call the API
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", get(api_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
