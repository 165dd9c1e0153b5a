pub mod handlers;
pub mod models;
pub mod openapi;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use http::{Method, header};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::core::repository::UserRepository;
use openapi::ApiDoc;

/// Routes only, no middleware.
pub fn router(repo: Arc<UserRepository>) -> Router {
    Router::new()
        .route("/", get(|| async { "OK" }))
        .route(
            "/api/users",
            get(handlers::get_users)
                .post(handlers::create_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .with_state(repo)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// The full application: routes plus compression, timeout, CORS and request
/// tracing.
pub fn app(repo: Arc<UserRepository>, request_timeout: Duration) -> Router {
    router(repo)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(TraceLayer::new_for_http())
}
