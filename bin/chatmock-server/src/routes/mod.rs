//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - `/health`
//! - `/api/message/{stream,fetch}` (optionally with fixture cookies)
//! - `/api/upload` and `/api/files/*` over the upload directory
//! - optional Swagger UI / OpenAPI document
//! - the built web client with an `index.html` fallback, when present
//! - CORS and per-request trace-id layers

pub mod doc;
mod health;
mod message;
mod upload;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tracing::debug;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cookies, cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let config = Arc::clone(&state.config);

    let mut message_router = message::router();
    if config.test_cookies {
        message_router = message_router.route_layer(middleware::from_fn(cookies::test_cookies));
    }

    let api_router = Router::new()
        .nest("/message", message_router)
        .merge(upload::router().layer(DefaultBodyLimit::max(config.max_upload_bytes)))
        .nest_service("/files", ServeDir::new(&config.upload_dir));

    let mut app = Router::new()
        .merge(health::router())
        .nest("/api", api_router);

    if config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    // Unknown paths belong to the client-side router.
    let index = config.frontend_dir.join("index.html");
    if index.is_file() {
        debug!(dir = %config.frontend_dir.display(), "serving web client");
        app = app.fallback_service(ServeDir::new(&config.frontend_dir).fallback(ServeFile::new(index)));
    }

    if let Some(cors) = cors::cors_layer(&config) {
        app = app.layer(cors);
    }

    // Outermost layers execute first on the way in.
    app.layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
