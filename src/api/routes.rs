use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::api::handlers::{self as api_handlers, AppState};
use crate::config::ServerConfig;

/// Create the router with all endpoints
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .route("/answer", post(api_handlers::answer))
        .route("/retrieve", post(api_handlers::retrieve))
        .route("/health", get(api_handlers::health_check))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            // Questions are short; refuse oversized bodies outright
            RequestBodyLimitLayer::new(server.max_request_body_size),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
}
